use crate::models::{Column, DisaggregatedSeries, ObservationFrame, Variable};
use crate::utils::constants::PRECIP_REQUEST;
use std::collections::HashMap;
use tracing::warn;

/// Selects and orders output columns from a user's variable request.
///
/// A generic "Precip" request expands in place to the five precipitation
/// columns. Unknown or unavailable variables are dropped, and the identity
/// columns (timestamp, station code) are always kept first.
#[derive(Debug, Clone)]
pub struct VariableProjector {
    selection: Vec<Variable>,
}

impl VariableProjector {
    pub fn new<S: AsRef<str>>(requested: &[S]) -> Self {
        let mut selection = Vec::new();

        for name in expand_request(requested) {
            match Variable::from_name(&name) {
                Some(variable) if !selection.contains(&variable) => selection.push(variable),
                Some(_) => {}
                None => warn!(variable = %name, "Ignoring unknown variable"),
            }
        }

        Self { selection }
    }

    /// Requested variables in output order, after expansion
    pub fn selection(&self) -> &[Variable] {
        &self.selection
    }

    /// Keep only the selected columns of `frame`, in request order
    pub fn project(&self, frame: ObservationFrame) -> ObservationFrame {
        let ObservationFrame {
            timestamps,
            station_codes,
            columns,
        } = frame;

        let mut available: HashMap<Variable, Column> =
            columns.into_iter().map(|c| (c.variable, c)).collect();

        let selected = self
            .selection
            .iter()
            .filter_map(|variable| available.remove(variable))
            .collect();

        ObservationFrame::from_parts(timestamps, station_codes, selected)
    }

    pub fn project_series(&self, series: &DisaggregatedSeries) -> ObservationFrame {
        self.project(series.to_frame())
    }
}

/// Replace each "Precip" entry with the precipitation sub-variables at the
/// same position
pub fn expand_request<S: AsRef<str>>(requested: &[S]) -> Vec<String> {
    requested
        .iter()
        .flat_map(|name| {
            let name = name.as_ref().trim();
            if name == PRECIP_REQUEST {
                Variable::PRECIP
                    .iter()
                    .map(|v| v.display_name().to_string())
                    .collect::<Vec<_>>()
            } else {
                vec![name.to_string()]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DisaggregatedRecord, ObservationRecord};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn series() -> DisaggregatedSeries {
        let ts = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut obs = ObservationRecord::empty(ts);
        obs.air_temperature = Some(5.0);
        obs.wind_speed_rate = Some(3.1);
        DisaggregatedSeries::new("KRDU", vec![DisaggregatedRecord::classified(obs, None)])
    }

    #[test]
    fn test_expand_request_in_place() {
        let expanded = expand_request(&["Air Temperature", "Precip", "Wind Direction"]);
        assert_eq!(
            expanded,
            vec![
                "Air Temperature",
                "One Hour Precip Depth",
                "Three Hour Precip Depth",
                "Six Hour Precip Depth",
                "Twelve Hour Precip Depth",
                "Other Precip Depth",
                "Wind Direction",
            ]
        );
    }

    #[test]
    fn test_projection_drops_unavailable_variable() {
        let frame = series().to_frame().without(Variable::WindSpeedRate);
        let projector = VariableProjector::new(&["Wind Speed Rate", "Precip"]);

        let projected = projector.project(frame);
        assert_eq!(
            projected.column_names(),
            vec![
                "timestamp",
                "station_code",
                "One Hour Precip Depth",
                "Three Hour Precip Depth",
                "Six Hour Precip Depth",
                "Twelve Hour Precip Depth",
                "Other Precip Depth",
            ]
        );
        assert_eq!(projected.len(), 1);
    }

    #[test]
    fn test_order_follows_request_not_schema() {
        let projector =
            VariableProjector::new(&["Sky Condition Code", "Air Temperature", "Wind Speed Rate"]);
        let projected = projector.project_series(&series());

        assert_eq!(
            projected.variables(),
            vec![
                Variable::SkyConditionCode,
                Variable::AirTemperature,
                Variable::WindSpeedRate
            ]
        );
        assert_eq!(projected.station_codes, vec!["KRDU".to_string()]);
    }

    #[test]
    fn test_unknown_and_duplicate_names() {
        let projector = VariableProjector::new(&[
            "Air Temperature",
            "Visibility",
            "Air Temperature",
            "Precip",
            "Six Hour Precip Depth",
        ]);

        assert_eq!(projector.selection().len(), 6);
        assert_eq!(projector.selection()[0], Variable::AirTemperature);
        assert_eq!(projector.selection()[3], Variable::SixHourPrecipDepth);
    }

    #[test]
    fn test_empty_request_keeps_identity_columns() {
        let projector = VariableProjector::new::<&str>(&[]);
        let projected = projector.project_series(&series());

        assert_eq!(projected.column_names(), vec!["timestamp", "station_code"]);
        assert_eq!(projected.len(), 1);
    }
}
