//! Offset/limit windows and ordering for list queries.
//!
//! Values arrive from untrusted query strings, so every constructor here
//! validates before anything reaches the database.

use serde::Deserialize;
use std::str::FromStr;
use utoipa::ToSchema;

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse};

/// Page size used when the caller does not send `limit`.
pub const DEFAULT_LIMIT: u64 = 100;
/// Largest page a caller can request; larger values are clamped.
pub const MAX_LIMIT: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    #[error("Invalid pagination parameters: skip must be >= 0 and limit must be > 0")]
    InvalidWindow,

    #[error("Invalid order_by column: {0}")]
    UnknownColumn(String),
}

/// Bounds applied to caller supplied pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: u64,
    pub max_limit: u64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
        }
    }
}

/// Environment variables:
/// - `PAGINATION_DEFAULT_LIMIT` (default: 100)
/// - `PAGINATION_MAX_LIMIT` (default: 500)
#[cfg(feature = "config")]
impl FromEnv for PageLimits {
    fn from_env() -> Result<Self, ConfigError> {
        let default_limit: u64 = env_parse("PAGINATION_DEFAULT_LIMIT", &DEFAULT_LIMIT.to_string())?;
        let max_limit: u64 = env_parse("PAGINATION_MAX_LIMIT", &MAX_LIMIT.to_string())?;

        if max_limit == 0 {
            return Err(ConfigError::ParseError {
                key: "PAGINATION_MAX_LIMIT".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }
        if default_limit == 0 || default_limit > max_limit {
            return Err(ConfigError::ParseError {
                key: "PAGINATION_DEFAULT_LIMIT".to_string(),
                details: format!("must be between 1 and PAGINATION_MAX_LIMIT ({max_limit})"),
            });
        }

        Ok(Self {
            default_limit,
            max_limit,
        })
    }
}

/// A validated offset + row-count window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: u64,
    pub limit: u64,
}

impl Page {
    /// Validates raw `skip`/`limit` query values.
    ///
    /// Missing values take the defaults (0 and `limits.default_limit`).
    /// Negative `skip` or non-positive `limit` is rejected; a `limit`
    /// above `limits.max_limit` is clamped to it.
    pub fn from_params(
        skip: Option<i64>,
        limit: Option<i64>,
        limits: &PageLimits,
    ) -> Result<Self, PageError> {
        let skip = u64::try_from(skip.unwrap_or(0)).map_err(|_| PageError::InvalidWindow)?;
        let limit = match limit {
            None => limits.default_limit,
            Some(limit) if limit > 0 => u64::try_from(limit).map_err(|_| PageError::InvalidWindow)?,
            Some(_) => return Err(PageError::InvalidWindow),
        };

        Ok(Self {
            skip,
            limit: limit.min(limits.max_limit),
        })
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl From<SortDirection> for sea_orm::Order {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => sea_orm::Order::Asc,
            SortDirection::Desc => sea_orm::Order::Desc,
        }
    }
}

/// An explicit single-column ordering requested by the caller.
#[derive(Debug, Clone, Copy)]
pub struct SortOrder<C> {
    pub column: C,
    pub direction: SortDirection,
}

impl<C: FromStr> SortOrder<C> {
    /// Resolves `order_by` against the columns a listing allows sorting on.
    ///
    /// Returns `Ok(None)` when no column was requested; `direction` alone is ignored.
    pub fn parse(
        order_by: Option<&str>,
        direction: Option<SortDirection>,
        sortable: &[&str],
    ) -> Result<Option<Self>, PageError> {
        let Some(name) = order_by else {
            return Ok(None);
        };

        if !sortable.contains(&name) {
            return Err(PageError::UnknownColumn(name.to_string()));
        }

        let column = C::from_str(name).map_err(|_| PageError::UnknownColumn(name.to_string()))?;

        Ok(Some(Self {
            column,
            direction: direction.unwrap_or_default(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Col {
        Name,
        DueDate,
    }

    impl FromStr for Col {
        type Err = ();

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "name" => Ok(Col::Name),
                "due_date" => Ok(Col::DueDate),
                _ => Err(()),
            }
        }
    }

    #[test]
    fn page_defaults_when_params_missing() {
        let page = Page::from_params(None, None, &PageLimits::default()).unwrap();
        assert_eq!(page, Page { skip: 0, limit: 100 });
    }

    #[test]
    fn page_rejects_negative_skip() {
        let err = Page::from_params(Some(-1), Some(10), &PageLimits::default()).unwrap_err();
        assert_eq!(err, PageError::InvalidWindow);
    }

    #[test]
    fn page_rejects_zero_and_negative_limit() {
        let limits = PageLimits::default();
        assert_eq!(
            Page::from_params(Some(0), Some(0), &limits),
            Err(PageError::InvalidWindow)
        );
        assert_eq!(
            Page::from_params(Some(0), Some(-5), &limits),
            Err(PageError::InvalidWindow)
        );
    }

    #[test]
    fn page_clamps_limit_to_max() {
        let limits = PageLimits {
            default_limit: 10,
            max_limit: 50,
        };
        let page = Page::from_params(Some(20), Some(1_000), &limits).unwrap();
        assert_eq!(page, Page { skip: 20, limit: 50 });
    }

    #[test]
    fn sort_order_none_without_column() {
        let order = SortOrder::<Col>::parse(None, Some(SortDirection::Desc), &["name"]).unwrap();
        assert!(order.is_none());
    }

    #[test]
    fn sort_order_defaults_to_ascending() {
        let order = SortOrder::<Col>::parse(Some("due_date"), None, &["name", "due_date"])
            .unwrap()
            .unwrap();
        assert_eq!(order.column, Col::DueDate);
        assert_eq!(order.direction, SortDirection::Asc);
    }

    #[test]
    fn sort_order_rejects_columns_outside_allow_list() {
        let err = SortOrder::<Col>::parse(Some("due_date"), None, &["name"]).unwrap_err();
        assert_eq!(err, PageError::UnknownColumn("due_date".into()));
    }

    #[test]
    fn sort_direction_parses_lowercase() {
        assert_eq!("desc".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert_eq!(SortDirection::Asc.to_string(), "asc");
        assert!(matches!(
            sea_orm::Order::from(SortDirection::Desc),
            sea_orm::Order::Desc
        ));
    }

    #[cfg(feature = "config")]
    #[test]
    fn page_limits_from_env() {
        temp_env::with_vars(
            [
                ("PAGINATION_DEFAULT_LIMIT", Some("25")),
                ("PAGINATION_MAX_LIMIT", Some("200")),
            ],
            || {
                let limits = PageLimits::from_env().unwrap();
                assert_eq!(limits.default_limit, 25);
                assert_eq!(limits.max_limit, 200);
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn page_limits_reject_default_above_max() {
        temp_env::with_vars(
            [
                ("PAGINATION_DEFAULT_LIMIT", Some("300")),
                ("PAGINATION_MAX_LIMIT", Some("200")),
            ],
            || {
                let err = PageLimits::from_env().unwrap_err();
                assert!(err.to_string().contains("PAGINATION_DEFAULT_LIMIT"));
            },
        );
    }
}
