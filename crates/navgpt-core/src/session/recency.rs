use chrono::{Local, NaiveDate, TimeZone};

/// Buckets used when listing conversations by creation day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecencyGroup {
    Today,
    Yesterday,
    PreviousSevenDays,
    Older,
}

impl RecencyGroup {
    pub const ALL: [RecencyGroup; 4] = [
        RecencyGroup::Today,
        RecencyGroup::Yesterday,
        RecencyGroup::PreviousSevenDays,
        RecencyGroup::Older,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RecencyGroup::Today => "Today",
            RecencyGroup::Yesterday => "Yesterday",
            RecencyGroup::PreviousSevenDays => "Previous 7 Days",
            RecencyGroup::Older => "Older",
        }
    }

    /// Classify a creation day relative to `today`.
    pub fn classify(day: NaiveDate, today: NaiveDate) -> Self {
        let days_ago = (today - day).num_days();
        match days_ago {
            0 => RecencyGroup::Today,
            1 => RecencyGroup::Yesterday,
            d if d < 7 => RecencyGroup::PreviousSevenDays,
            _ => RecencyGroup::Older,
        }
    }

    /// Classify a millisecond timestamp by its local calendar day.
    pub fn for_timestamp(created_at_ms: i64, today: NaiveDate) -> Self {
        match Local.timestamp_millis_opt(created_at_ms).single() {
            Some(dt) => Self::classify(dt.date_naive(), today),
            None => RecencyGroup::Older,
        }
    }
}

impl std::fmt::Display for RecencyGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
