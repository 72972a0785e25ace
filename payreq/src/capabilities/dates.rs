//! Date range filters for list endpoints.

use crate::errors::Result;
use crate::request::Request;
use crate::validation::validate_date;
use serde_json::json;

const WIRE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `date_before`, `date_after` and `date_between` filters.
///
/// Dates are validated and sent as `YYYY-MM-DD HH:MM:SS`.
pub trait DateFilters: Request {
    /// Only records created before `date`.
    fn set_date_before(&mut self, date: &str) -> Result<()> {
        let parsed = validate_date(date, "date_before")?;
        self.core_mut().set_param("date_before", json!(parsed.format(WIRE_FORMAT).to_string()))
    }

    /// Only records created after `date`.
    fn set_date_after(&mut self, date: &str) -> Result<()> {
        let parsed = validate_date(date, "date_after")?;
        self.core_mut().set_param("date_after", json!(parsed.format(WIRE_FORMAT).to_string()))
    }

    /// Only records created between `start` and `end`.
    fn set_date_between(&mut self, start: &str, end: &str) -> Result<()> {
        let start = validate_date(start, "date_between")?;
        let end = validate_date(end, "date_between")?;
        self.core_mut().set_param(
            "date_between",
            json!([
                start.format(WIRE_FORMAT).to_string(),
                end.format(WIRE_FORMAT).to_string()
            ]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::RequestDescriptor;
    use crate::errors::codes;
    use crate::request::{RequestCore, RequestType};
    use crate::testing::mock_transport;

    static DATED: RequestDescriptor = RequestDescriptor {
        name: "date_filters_test",
        ..RequestDescriptor::BLANK
    };

    #[derive(Debug)]
    struct Dated {
        core: RequestCore,
    }

    impl Request for Dated {
        fn core(&self) -> &RequestCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut RequestCore {
            &mut self.core
        }
    }

    impl RequestType for Dated {
        fn type_descriptor() -> &'static RequestDescriptor {
            &DATED
        }

        fn from_core(core: RequestCore) -> Self {
            Self { core }
        }
    }

    impl DateFilters for Dated {}

    #[test]
    fn test_dates_normalized() {
        let mut request = Dated::create(mock_transport(), None).unwrap();
        request.set_date_before("2024-02-01").unwrap();
        request.set_date_after("2024-01-01T08:30:00Z").unwrap();
        request.set_date_between("2024-01-01", "2024-01-31 23:59:59").unwrap();

        let params = request.get_params().unwrap();
        assert_eq!(params["date_before"], json!("2024-02-01 00:00:00"));
        assert_eq!(params["date_after"], json!("2024-01-01 08:30:00"));
        assert_eq!(
            params["date_between"],
            json!(["2024-01-01 00:00:00", "2024-01-31 23:59:59"])
        );
    }

    #[test]
    fn test_invalid_date_echoes_input() {
        let mut request = Dated::create(mock_transport(), None).unwrap();
        let err = request.set_date_before("next tuesday").unwrap_err();
        assert_eq!(err.code(), codes::DATE);
        assert!(err.to_string().contains("next tuesday"));
    }
}
