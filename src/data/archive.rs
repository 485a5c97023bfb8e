//! Gaia archive and name-resolution clients.
//!
//! Cone searches go through the TAP synchronous endpoint with ADQL; the
//! response is requested as CSV and funneled through the same table parser
//! as local files. Object names resolve through the CDS Sesame service.

use reqwest::blocking::Client;

use crate::domain::SkyPoint;
use crate::error::AppError;
use crate::io::table::{TableRead, parse_table};

const DEFAULT_TAP_URL: &str = "https://gea.esac.esa.int/tap-server/tap/sync";
const SESAME_URL: &str = "https://cds.unistra.fr/cgi-bin/nph-sesame/-oI/A";
const SOURCE_TABLE: &str = "gaiadr3.gaia_source";

pub struct ArchiveClient {
    client: Client,
    tap_url: String,
}

impl ArchiveClient {
    /// Build a client, honoring `ASTROGAIA_TAP_URL` from the environment
    /// (a `.env` file is read when present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let tap_url =
            std::env::var("ASTROGAIA_TAP_URL").unwrap_or_else(|_| DEFAULT_TAP_URL.to_string());
        Self {
            client: Client::new(),
            tap_url,
        }
    }

    /// Fetch every source within `radius_deg` of `center`.
    pub fn fetch_cone(
        &self,
        center: SkyPoint,
        radius_deg: f64,
        limit: usize,
    ) -> Result<TableRead, AppError> {
        if !(radius_deg.is_finite() && radius_deg > 0.0) {
            return Err(AppError::input(format!(
                "Cone radius must be positive, got {radius_deg} deg."
            )));
        }
        if limit == 0 {
            return Err(AppError::input("Archive row limit must be at least 1."));
        }

        let query = cone_query(center, radius_deg, limit);
        let response = self
            .client
            .post(&self.tap_url)
            .form(&[
                ("REQUEST", "doQuery"),
                ("LANG", "ADQL"),
                ("FORMAT", "csv"),
                ("QUERY", query.as_str()),
            ])
            .send()
            .map_err(|e| AppError::invariant(format!("Archive request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::invariant(format!(
                "Archive request failed with status {}.",
                response.status()
            )));
        }

        let body = response
            .text()
            .map_err(|e| AppError::invariant(format!("Failed to read archive response: {e}")))?;
        parse_table(body.as_bytes())
    }

    /// Resolve an object name to ICRS coordinates via Sesame.
    pub fn resolve_center(&self, name: &str) -> Result<SkyPoint, AppError> {
        let response = self
            .client
            .get(format!("{SESAME_URL}?{}", name.replace(' ', "+")))
            .send()
            .map_err(|e| AppError::invariant(format!("Name resolution failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::invariant(format!(
                "Name resolution failed with status {}.",
                response.status()
            )));
        }

        let body = response
            .text()
            .map_err(|e| AppError::invariant(format!("Failed to read Sesame response: {e}")))?;
        parse_sesame_position(&body)
            .ok_or_else(|| AppError::no_data(format!("Could not resolve object name '{name}'.")))
    }
}

/// ADQL for a circular selection around `center`.
fn cone_query(center: SkyPoint, radius_deg: f64, limit: usize) -> String {
    format!(
        "SELECT TOP {limit} source_id, ra, dec, pmra, pmdec, parallax, phot_g_mean_mag \
         FROM {SOURCE_TABLE} \
         WHERE 1 = CONTAINS(POINT('ICRS', ra, dec), CIRCLE('ICRS', {:.8}, {:.8}, {:.8}))",
        center.ra, center.dec, radius_deg
    )
}

/// Pull the J2000 position out of a Sesame text response.
///
/// Sesame reports coordinates on a line shaped like `%J 10.68470 41.26900 = ...`.
fn parse_sesame_position(body: &str) -> Option<SkyPoint> {
    for line in body.lines() {
        let Some(rest) = line.strip_prefix("%J ") else {
            continue;
        };
        let mut fields = rest.split_whitespace();
        let ra = fields.next().and_then(|f| f.parse::<f64>().ok());
        let dec = fields.next().and_then(|f| f.parse::<f64>().ok());
        if let (Some(ra), Some(dec)) = (ra, dec) {
            return Some(SkyPoint { ra, dec });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cone_query_embeds_center_radius_and_limit() {
        let query = cone_query(
            SkyPoint {
                ra: 10.0,
                dec: -20.0,
            },
            0.5,
            5000,
        );
        assert!(query.starts_with("SELECT TOP 5000"));
        assert!(query.contains("gaiadr3.gaia_source"));
        assert!(query.contains("CIRCLE('ICRS', 10.00000000, -20.00000000, 0.50000000)"));
    }

    #[test]
    fn sesame_positions_parse_from_the_j2000_line() {
        let body = "# NGC 104\n%J 6.02363 -72.08128 = NGC 104\n%I NGC 104\n";
        let point = parse_sesame_position(body).unwrap();
        assert!((point.ra - 6.02363).abs() < 1e-9);
        assert!((point.dec + 72.08128).abs() < 1e-9);
    }

    #[test]
    fn unresolvable_names_yield_nothing() {
        assert!(parse_sesame_position("#!Sesame: nothing found\n").is_none());
    }
}
