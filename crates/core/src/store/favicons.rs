//! Favicon lookups against a `favicons.sqlite` snapshot.

use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::OptionalExtension;

use super::connection::SnapshotDb;
use super::like_pattern;
use crate::Error;

/// Raw icon bytes for a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaviconBlob {
    pub data: Vec<u8>,
    pub width: i64,
}

const ICON_SQL: &str = "SELECT moz_icons.data, moz_icons.width FROM moz_icons
     JOIN moz_icons_to_pages ON moz_icons.id = moz_icons_to_pages.icon_id
     JOIN moz_pages_w_icons ON moz_icons_to_pages.page_id = moz_pages_w_icons.id
     WHERE moz_icons.data IS NOT NULL";

/// How a page is matched against `moz_pages_w_icons.page_url`.
#[derive(Debug, Clone)]
enum PageMatch {
    Exact(String),
    HostContains(String),
}

impl SnapshotDb<'_> {
    /// Find the widest icon for `url`.
    ///
    /// Tries an exact page match first, then any page whose URL contains the
    /// host of `url`. Failures are logged and treated as "no icon".
    pub async fn favicon(&self, url: &str) -> Option<FaviconBlob> {
        match self.lookup_icon(PageMatch::Exact(url.to_string())).await {
            Ok(Some(blob)) => return Some(blob),
            Ok(None) => {}
            Err(e) => tracing::debug!(conn = %self.id(), url, error = %e, "exact favicon lookup failed"),
        }

        let host = url::Url::parse(url).ok()?.host_str()?.to_string();
        match self.lookup_icon(PageMatch::HostContains(host)).await {
            Ok(found) => found,
            Err(e) => {
                tracing::debug!(conn = %self.id(), url, error = %e, "host favicon lookup failed");
                None
            }
        }
    }

    async fn lookup_icon(&self, page: PageMatch) -> Result<Option<FaviconBlob>, Error> {
        self.conn
            .call(move |conn| -> Result<Option<FaviconBlob>, Error> {
                let (clause, bound) = match page {
                    PageMatch::Exact(url) => ("moz_pages_w_icons.page_url = ?1", url),
                    PageMatch::HostContains(host) => {
                        ("moz_pages_w_icons.page_url LIKE ?1 ESCAPE '\\'", like_pattern(&host))
                    }
                };
                let sql = format!("{ICON_SQL} AND {clause} ORDER BY moz_icons.width DESC LIMIT 1");

                let blob = conn
                    .query_row(&sql, params![bound], |row| {
                        Ok(FaviconBlob { data: row.get(0)?, width: row.get::<_, Option<i64>>(1)?.unwrap_or_default() })
                    })
                    .optional()?;
                Ok(blob)
            })
            .await
            .map_err(Error::from)
    }
}
