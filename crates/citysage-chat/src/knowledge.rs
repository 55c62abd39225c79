//! Ordered keyword knowledge base.
//!
//! Entries are kept in insertion order, which is also their match priority:
//! when several keywords occur in one question the earliest entry wins.

use std::slice;

use citysage_core::config::KnowledgeEntryConfig;

use crate::error::ChatError;

const CARBON_EMISSIONS: &str = "To reduce carbon emissions, cities can implement several strategies:\n\n• **Green Transportation**: Expand public transit, promote electric vehicles, and create bike-friendly infrastructure\n• **Energy Efficiency**: Retrofit buildings with LED lighting, smart HVAC systems, and renewable energy sources\n• **Urban Planning**: Develop compact, mixed-use neighborhoods to reduce travel distances\n• **Green Spaces**: Increase urban forests and parks to absorb CO2\n• **Waste Management**: Implement circular economy principles and reduce landfill methane emissions\n\nThese measures can typically reduce city-wide emissions by 20-40% within 5-10 years.";

const WASTE_MANAGEMENT: &str = "Effective waste management involves a comprehensive approach:\n\n• **Reduce**: Implement policies to minimize single-use plastics and packaging\n• **Reuse**: Create community swap programs and repair cafes\n• **Recycle**: Establish robust sorting and processing facilities\n• **Compost**: Set up organic waste collection and processing\n• **Education**: Run citizen awareness campaigns\n• **Technology**: Use IoT sensors for smart bin monitoring and route optimization\n\nBest practice cities achieve 60-80% waste diversion from landfills.";

const PUBLIC_TRANSPORTATION: &str = "Improving public transportation requires strategic planning:\n\n• **Network Design**: Create comprehensive routes connecting key destinations\n• **Frequency**: Increase service frequency to reduce wait times\n• **Accessibility**: Ensure all stations and vehicles are accessible\n• **Integration**: Connect different transport modes (bus, rail, bike-share)\n• **Technology**: Implement real-time tracking and mobile ticketing\n• **Electrification**: Transition to electric buses and trains\n• **Affordability**: Offer competitive pricing and subsidies\n\nWell-designed systems can increase ridership by 30-50%.";

const GREEN_BUILDING: &str = "Green building standards focus on sustainability:\n\n• **Energy Efficiency**: High-performance insulation, windows, and HVAC systems\n• **Renewable Energy**: Solar panels, geothermal systems, and wind power\n• **Water Conservation**: Low-flow fixtures, rainwater harvesting, and greywater systems\n• **Materials**: Use sustainable, locally-sourced, and recycled materials\n• **Indoor Air Quality**: Non-toxic materials and proper ventilation\n• **Certifications**: LEED, BREEAM, or local green building standards\n\nGreen buildings typically use 30-50% less energy and water than conventional buildings.";

const CITIZEN_ENGAGEMENT: &str = "Increasing citizen engagement requires multiple approaches:\n\n• **Digital Platforms**: Create user-friendly apps and websites for feedback\n• **Community Events**: Host town halls, workshops, and neighborhood meetings\n• **Participatory Budgeting**: Let citizens vote on spending priorities\n• **Transparency**: Publish open data and regular progress reports\n• **Education**: Provide clear information about city initiatives\n• **Incentives**: Offer rewards for participation and sustainable behaviors\n• **Accessibility**: Ensure all communication is multilingual and accessible\n\nEngaged communities see 40-60% higher participation in city programs.";

const SMART_CITY: &str = "Smart city technologies enhance urban efficiency:\n\n• **IoT Sensors**: Monitor air quality, traffic, noise, and infrastructure\n• **Data Analytics**: Use AI to optimize city services and predict needs\n• **Smart Grids**: Implement intelligent energy distribution systems\n• **Connected Transportation**: Traffic management and autonomous vehicle infrastructure\n• **Digital Services**: Online portals for permits, payments, and services\n• **5G Networks**: Enable high-speed connectivity for all systems\n• **Cybersecurity**: Protect critical infrastructure and citizen data\n\nSmart city initiatives can improve service efficiency by 20-30% while reducing costs.";

/// Built-in topics in match-priority order.
const BUILTIN: [(&str, &str); 6] = [
    ("carbon emissions", CARBON_EMISSIONS),
    ("waste management", WASTE_MANAGEMENT),
    ("public transportation", PUBLIC_TRANSPORTATION),
    ("green building", GREEN_BUILDING),
    ("citizen engagement", CITIZEN_ENGAGEMENT),
    ("smart city", SMART_CITY),
];

// =============================================================================
// KnowledgeEntry
// =============================================================================

/// A keyword and the canned explanation returned when it is mentioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeEntry {
    keyword: String,
    response: String,
}

impl KnowledgeEntry {
    /// Create an entry. The keyword is stored lower-cased.
    ///
    /// Fails if the keyword is blank or the response is empty.
    pub fn new(keyword: impl Into<String>, response: impl Into<String>) -> Result<Self, ChatError> {
        let keyword = keyword.into();
        let response = response.into();
        if keyword.trim().is_empty() {
            return Err(ChatError::InvalidKnowledgeEntry(
                "keyword cannot be empty".to_string(),
            ));
        }
        if response.is_empty() {
            return Err(ChatError::InvalidKnowledgeEntry(format!(
                "response for '{}' cannot be empty",
                keyword
            )));
        }
        Ok(Self {
            keyword: keyword.to_lowercase(),
            response,
        })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn response(&self) -> &str {
        &self.response
    }
}

// =============================================================================
// KnowledgeBase
// =============================================================================

/// Immutable, ordered keyword table. Shared read-only after construction.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    /// The six Smart City topics the assistant ships with.
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(keyword, response)| KnowledgeEntry {
                keyword: (*keyword).to_string(),
                response: (*response).to_string(),
            })
            .collect();
        Self { entries }
    }

    /// Build a base from entries, keeping their order.
    pub fn from_entries(entries: Vec<KnowledgeEntry>) -> Self {
        Self { entries }
    }

    /// Build a base from configuration, or the built-in topics when the
    /// configured list is empty.
    pub fn from_config(entries: &[KnowledgeEntryConfig]) -> Result<Self, ChatError> {
        if entries.is_empty() {
            return Ok(Self::builtin());
        }
        let entries = entries
            .iter()
            .map(|e| KnowledgeEntry::new(e.keyword.as_str(), e.response.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(count = entries.len(), "Knowledge base loaded from config");
        Ok(Self { entries })
    }

    pub fn iter(&self) -> slice::Iter<'_, KnowledgeEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Topic keywords in priority order.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.keyword.as_str())
    }
}

impl<'a> IntoIterator for &'a KnowledgeBase {
    type Item = &'a KnowledgeEntry;
    type IntoIter = slice::Iter<'a, KnowledgeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// =============================================================================
// Tests
// =============================================================================
