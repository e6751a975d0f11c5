use crate::error::{GanttError, GanttResult};

/// Controls what granularity the timeline displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GanttScale {
    Day,
    Week,
    Month,
}

/// How bottom-row cells are rolled up into the coarse top header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingRule {
    ByMonth,
    ByYear,
}

/// Static per-scale configuration: label unit, cell width, grouping.
#[derive(Debug, Clone, Copy)]
pub struct ScaleConfig {
    pub label_unit: &'static str,
    /// Width of one bottom-row cell. Fixed per unit regardless of the unit's
    /// actual day count (a 28-day and a 31-day month render the same width).
    pub px_per_unit: f32,
    pub grouping: GroupingRule,
}

const DAY_CONFIG: ScaleConfig = ScaleConfig {
    label_unit: "Day",
    px_per_unit: 48.0,
    grouping: GroupingRule::ByMonth,
};

const WEEK_CONFIG: ScaleConfig = ScaleConfig {
    label_unit: "Week",
    px_per_unit: 84.0,
    grouping: GroupingRule::ByMonth,
};

const MONTH_CONFIG: ScaleConfig = ScaleConfig {
    label_unit: "Month",
    px_per_unit: 120.0,
    grouping: GroupingRule::ByYear,
};

impl GanttScale {
    /// Every supported scale, in selector order.
    pub const ALL: [GanttScale; 3] = [GanttScale::Day, GanttScale::Week, GanttScale::Month];

    /// Registry lookup by wire key. Unknown keys are a configuration error
    /// the caller must handle before rendering anything.
    pub fn from_key(key: &str) -> GanttResult<Self> {
        match key {
            "daily" => Ok(GanttScale::Day),
            "weekly" => Ok(GanttScale::Week),
            "monthly" => Ok(GanttScale::Month),
            other => Err(GanttError::UnknownScale(other.to_string())),
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            GanttScale::Day => "daily",
            GanttScale::Week => "weekly",
            GanttScale::Month => "monthly",
        }
    }

    pub fn config(&self) -> &'static ScaleConfig {
        match self {
            GanttScale::Day => &DAY_CONFIG,
            GanttScale::Week => &WEEK_CONFIG,
            GanttScale::Month => &MONTH_CONFIG,
        }
    }

    /// Nominal day count of one unit, used for pixel/date conversion during
    /// drags. Months use 30 as the nominal length to match fixed-width cells.
    pub fn nominal_days_per_unit(&self) -> f32 {
        match self {
            GanttScale::Day => 1.0,
            GanttScale::Week => 7.0,
            GanttScale::Month => 30.0,
        }
    }

    /// Pixels covered by one calendar day under this scale.
    pub fn px_per_day(&self) -> f32 {
        self.config().px_per_unit / self.nominal_days_per_unit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_resolves_known_keys() {
        assert_eq!(GanttScale::from_key("daily").unwrap(), GanttScale::Day);
        assert_eq!(GanttScale::from_key("weekly").unwrap(), GanttScale::Week);
        assert_eq!(GanttScale::from_key("monthly").unwrap(), GanttScale::Month);
    }

    #[test]
    fn unknown_key_is_a_configuration_error() {
        let err = GanttScale::from_key("hourly").unwrap_err();
        assert!(matches!(err, GanttError::UnknownScale(k) if k == "hourly"));
    }

    #[test]
    fn keys_round_trip_through_the_registry() {
        for scale in GanttScale::ALL {
            assert_eq!(GanttScale::from_key(scale.key()).unwrap(), scale);
        }
    }

    #[test]
    fn px_per_day_divides_the_cell_width() {
        assert_eq!(GanttScale::Day.px_per_day(), 48.0);
        assert_eq!(GanttScale::Week.px_per_day(), 12.0);
        assert_eq!(GanttScale::Month.px_per_day(), 4.0);
    }
}
