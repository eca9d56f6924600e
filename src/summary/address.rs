// reservoir-core/src/summary/address.rs

use super::category::SummaryCategory;

/// Qualifier slot value meaning "not set".
pub(crate) const UNSET: i32 = -1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatisticsType {
    #[default]
    None,
    P10,
    P50,
    P90,
    Mean,
}

impl StatisticsType {
    pub fn prefix(&self) -> Option<&'static str> {
        match self {
            StatisticsType::None => None,
            StatisticsType::P10 => Some("P10"),
            StatisticsType::P50 => Some("P50"),
            StatisticsType::P90 => Some("P90"),
            StatisticsType::Mean => Some("MEAN"),
        }
    }

    pub fn from_prefix(token: &str) -> Option<StatisticsType> {
        match token.trim().to_ascii_uppercase().as_str() {
            "P10" => Some(StatisticsType::P10),
            "P50" => Some(StatisticsType::P50),
            "P90" => Some(StatisticsType::P90),
            "MEAN" => Some(StatisticsType::Mean),
            _ => None,
        }
    }
}

/// Identifies one named summary vector.
///
/// The three integer qualifiers are kept in a fixed slot order. Cell indices
/// are stored as `(K, J, I)` so that the derived ordering sorts block-like
/// addresses K-major. Field order below is the ordering tuple.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SummaryAddress {
    category: SummaryCategory,
    vector_name: String,
    number0: i32,
    number1: i32,
    number2: i32,
    name: String,
    lgr_name: String,
    statistics: StatisticsType,
    is_error_result: bool,
    id: i32,
}

impl Default for SummaryAddress {
    fn default() -> Self {
        Self {
            category: SummaryCategory::Invalid,
            vector_name: String::new(),
            number0: UNSET,
            number1: UNSET,
            number2: UNSET,
            name: String::new(),
            lgr_name: String::new(),
            statistics: StatisticsType::None,
            is_error_result: false,
            id: UNSET,
        }
    }
}

impl SummaryAddress {
    fn with_category(category: SummaryCategory, vector_name: &str, id: Option<i32>) -> Self {
        Self {
            category,
            vector_name: vector_name.to_string(),
            id: id.unwrap_or(UNSET),
            ..Default::default()
        }
    }

    fn set_cell_ijk(&mut self, i: i32, j: i32, k: i32) {
        self.number0 = k;
        self.number1 = j;
        self.number2 = i;
    }

    pub fn field(vector_name: &str, id: Option<i32>) -> Self {
        Self::with_category(SummaryCategory::Field, vector_name, id)
    }

    pub fn aquifer(vector_name: &str, aquifer_number: i32, id: Option<i32>) -> Self {
        let mut address = Self::with_category(SummaryCategory::Aquifer, vector_name, id);
        address.number0 = aquifer_number;
        address
    }

    pub fn network(vector_name: &str, network_name: &str, id: Option<i32>) -> Self {
        let mut address = Self::with_category(SummaryCategory::Network, vector_name, id);
        address.name = network_name.to_string();
        address
    }

    pub fn misc(vector_name: &str, id: Option<i32>) -> Self {
        Self::with_category(SummaryCategory::Misc, vector_name, id)
    }

    pub fn region(vector_name: &str, region_number: i32, id: Option<i32>) -> Self {
        let mut address = Self::with_category(SummaryCategory::Region, vector_name, id);
        address.number0 = region_number;
        address
    }

    pub fn region_to_region(
        vector_name: &str,
        region_number: i32,
        region_number2: i32,
        id: Option<i32>,
    ) -> Self {
        let mut address = Self::with_category(SummaryCategory::RegionToRegion, vector_name, id);
        address.number0 = region_number;
        address.number1 = region_number2;
        address
    }

    pub fn group(vector_name: &str, group_name: &str, id: Option<i32>) -> Self {
        let mut address = Self::with_category(SummaryCategory::Group, vector_name, id);
        address.name = group_name.to_string();
        address
    }

    pub fn well(vector_name: &str, well_name: &str, id: Option<i32>) -> Self {
        let mut address = Self::with_category(SummaryCategory::Well, vector_name, id);
        address.name = well_name.to_string();
        address
    }

    pub fn well_completion(
        vector_name: &str,
        well_name: &str,
        completion_number: i32,
        id: Option<i32>,
    ) -> Self {
        let mut address = Self::with_category(SummaryCategory::WellCompletion, vector_name, id);
        address.name = well_name.to_string();
        address.number0 = completion_number;
        address
    }

    pub fn well_connection(
        vector_name: &str,
        well_name: &str,
        i: i32,
        j: i32,
        k: i32,
        id: Option<i32>,
    ) -> Self {
        let mut address = Self::with_category(SummaryCategory::WellConnection, vector_name, id);
        address.name = well_name.to_string();
        address.set_cell_ijk(i, j, k);
        address
    }

    pub fn well_lgr(vector_name: &str, lgr_name: &str, well_name: &str, id: Option<i32>) -> Self {
        let mut address = Self::with_category(SummaryCategory::WellLgr, vector_name, id);
        address.lgr_name = lgr_name.to_string();
        address.name = well_name.to_string();
        address
    }

    pub fn well_connection_lgr(
        vector_name: &str,
        lgr_name: &str,
        well_name: &str,
        i: i32,
        j: i32,
        k: i32,
        id: Option<i32>,
    ) -> Self {
        let mut address =
            Self::with_category(SummaryCategory::WellConnectionLgr, vector_name, id);
        address.lgr_name = lgr_name.to_string();
        address.name = well_name.to_string();
        address.set_cell_ijk(i, j, k);
        address
    }

    pub fn well_segment(
        vector_name: &str,
        well_name: &str,
        segment_number: i32,
        id: Option<i32>,
    ) -> Self {
        let mut address = Self::with_category(SummaryCategory::WellSegment, vector_name, id);
        address.name = well_name.to_string();
        address.number0 = segment_number;
        address
    }

    pub fn block(vector_name: &str, i: i32, j: i32, k: i32, id: Option<i32>) -> Self {
        let mut address = Self::with_category(SummaryCategory::Block, vector_name, id);
        address.set_cell_ijk(i, j, k);
        address
    }

    pub fn block_lgr(
        vector_name: &str,
        lgr_name: &str,
        i: i32,
        j: i32,
        k: i32,
        id: Option<i32>,
    ) -> Self {
        let mut address = Self::with_category(SummaryCategory::BlockLgr, vector_name, id);
        address.lgr_name = lgr_name.to_string();
        address.set_cell_ijk(i, j, k);
        address
    }

    pub fn imported(vector_name: &str, id: Option<i32>) -> Self {
        Self::with_category(SummaryCategory::Imported, vector_name, id)
    }

    pub fn time() -> Self {
        Self::with_category(SummaryCategory::Time, "TIME", None)
    }

    pub fn category(&self) -> SummaryCategory {
        self.category
    }

    pub fn vector_name(&self) -> &str {
        &self.vector_name
    }

    pub fn region_number(&self) -> i32 {
        self.number0
    }

    pub fn region_number2(&self) -> i32 {
        self.number1
    }

    pub fn group_name(&self) -> Option<&str> {
        (self.category == SummaryCategory::Group).then_some(self.name.as_str())
    }

    pub fn network_name(&self) -> Option<&str> {
        (self.category == SummaryCategory::Network).then_some(self.name.as_str())
    }

    pub fn well_name(&self) -> Option<&str> {
        self.is_dependent_on_well_name()
            .then_some(self.name.as_str())
    }

    pub fn well_segment_number(&self) -> i32 {
        self.number0
    }

    pub fn well_completion_number(&self) -> i32 {
        self.number0
    }

    pub fn aquifer_number(&self) -> i32 {
        self.number0
    }

    pub fn cell_i(&self) -> i32 {
        self.number2
    }

    pub fn cell_j(&self) -> i32 {
        self.number1
    }

    pub fn cell_k(&self) -> i32 {
        self.number0
    }

    pub fn lgr_name(&self) -> &str {
        &self.lgr_name
    }

    pub fn statistics(&self) -> StatisticsType {
        self.statistics
    }

    pub fn is_error_result(&self) -> bool {
        self.is_error_result
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn is_calculated(&self) -> bool {
        self.id != UNSET
    }

    pub fn is_time(&self) -> bool {
        self.category == SummaryCategory::Time
    }

    pub fn set_vector_name(&mut self, vector_name: &str) {
        self.vector_name = vector_name.to_string();
    }

    pub fn set_error_result(&mut self, is_error_result: bool) {
        self.is_error_result = is_error_result;
    }

    pub fn set_statistics(&mut self, statistics: StatisticsType) {
        self.statistics = statistics;
    }

    pub fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    /// Copy of this address with another vector name and all other fields kept.
    pub fn with_vector_name(&self, vector_name: &str) -> Self {
        let mut address = self.clone();
        address.vector_name = vector_name.to_string();
        address
    }

    pub fn is_dependent_on_well_name(&self) -> bool {
        matches!(
            self.category,
            SummaryCategory::Well
                | SummaryCategory::WellCompletion
                | SummaryCategory::WellConnection
                | SummaryCategory::WellConnectionLgr
                | SummaryCategory::WellLgr
                | SummaryCategory::WellSegment
        )
    }

    pub fn is_valid_eclipse_category(&self) -> bool {
        !matches!(
            self.category,
            SummaryCategory::Invalid | SummaryCategory::Imported | SummaryCategory::Time
        )
    }

    pub fn is_history_vector(&self) -> bool {
        self.vector_name.ends_with('H')
    }

    /// Vector name stripped of user suffixes. Eight character names are cut to
    /// five before looking for the first `_`.
    pub fn base_vector_name(&self) -> String {
        base_vector_name(&self.vector_name)
    }

    pub fn has_accumulated_data(&self) -> bool {
        if !self.is_valid_eclipse_category() {
            return false;
        }
        let base = self.base_vector_name();
        if base == "WCT" || base == "WCTH" {
            return false;
        }
        base.ends_with('T') || base.ends_with("TH")
    }

    pub fn is_valid(&self) -> bool {
        if self.vector_name.is_empty() {
            return self.category == SummaryCategory::Time;
        }
        match self.category {
            SummaryCategory::Invalid | SummaryCategory::Imported => false,
            SummaryCategory::Field | SummaryCategory::Misc | SummaryCategory::Time => true,
            SummaryCategory::Region | SummaryCategory::Aquifer => self.number0 != UNSET,
            SummaryCategory::RegionToRegion => self.number0 != UNSET && self.number1 != UNSET,
            SummaryCategory::Group | SummaryCategory::Network | SummaryCategory::Well => {
                !self.name.is_empty()
            }
            SummaryCategory::WellCompletion | SummaryCategory::WellSegment => {
                !self.name.is_empty() && self.number0 != UNSET
            }
            SummaryCategory::WellConnection => !self.name.is_empty() && self.has_cell_ijk(),
            SummaryCategory::WellLgr => !self.name.is_empty() && !self.lgr_name.is_empty(),
            SummaryCategory::WellConnectionLgr => {
                !self.name.is_empty() && !self.lgr_name.is_empty() && self.has_cell_ijk()
            }
            SummaryCategory::Block => self.has_cell_ijk(),
            SummaryCategory::BlockLgr => !self.lgr_name.is_empty() && self.has_cell_ijk(),
        }
    }

    fn has_cell_ijk(&self) -> bool {
        self.number0 != UNSET && self.number1 != UNSET && self.number2 != UNSET
    }

    /// Qualifier part of the text form, without vector name or prefixes.
    pub fn item_text(&self) -> String {
        match self.category {
            SummaryCategory::Region | SummaryCategory::Aquifer => self.number0.to_string(),
            SummaryCategory::RegionToRegion => format!("{}-{}", self.number0, self.number1),
            SummaryCategory::Group | SummaryCategory::Network | SummaryCategory::Well => {
                self.name.clone()
            }
            SummaryCategory::WellCompletion | SummaryCategory::WellSegment => {
                format!("{}:{}", self.name, self.number0)
            }
            SummaryCategory::WellConnection => {
                format!("{}:{}", self.name, self.ijk_text())
            }
            SummaryCategory::WellLgr => format!("{}:{}", self.lgr_name, self.name),
            SummaryCategory::WellConnectionLgr => {
                format!("{}:{}:{}", self.lgr_name, self.name, self.ijk_text())
            }
            SummaryCategory::Block => self.ijk_text(),
            SummaryCategory::BlockLgr => format!("{}:{}", self.lgr_name, self.ijk_text()),
            SummaryCategory::Field
            | SummaryCategory::Misc
            | SummaryCategory::Imported
            | SummaryCategory::Time
            | SummaryCategory::Invalid => String::new(),
        }
    }

    pub fn ijk_text(&self) -> String {
        format!("{},{},{}", self.cell_i(), self.cell_j(), self.cell_k())
    }
}

pub(crate) fn base_vector_name(vector_name: &str) -> String {
    let mut base = vector_name;
    if base.len() == 8 && base.is_char_boundary(5) {
        base = &base[..5];
    }
    match base.find('_') {
        Some(position) => base[..position].to_string(),
        None => base.to_string(),
    }
}

/// Parses `"I,J,K"`. Malformed input yields `-1` for every index.
pub fn ijk_from_text(text: &str) -> (i32, i32, i32) {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() == 3 {
        if let (Ok(i), Ok(j), Ok(k)) = (parts[0].parse(), parts[1].parse(), parts[2].parse()) {
            return (i, j, k);
        }
    }
    (UNSET, UNSET, UNSET)
}

/// Parses `"R1-R2"`, tolerating spaces around the dash.
pub fn region_pair_from_text(text: &str) -> (i32, i32) {
    let parts: Vec<&str> = text.split('-').map(str::trim).collect();
    if parts.len() == 2 {
        if let (Ok(r1), Ok(r2)) = (parts[0].parse(), parts[1].parse()) {
            return (r1, r2);
        }
    }
    (UNSET, UNSET)
}
