//! Text and JSON rendering of query results.

use anyhow::Result;
use serde::Serialize;

use spectab_band::Band;

/// Text block for a list of bands, one compact line per band.
pub fn bands_text<'a, I>(bands: I) -> String
where
    I: IntoIterator<Item = &'a Band>,
{
    let lines: Vec<String> = bands.into_iter().map(Band::compact_str).collect();
    lines.join("\n")
}

/// Pretty JSON for any serializable result.
pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Print bands to stdout, as JSON when `as_json`.
pub fn print_bands(bands: &[&Band], as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", json(bands)?);
    } else if bands.is_empty() {
        println!("no bands");
    } else {
        println!("{}", bands_text(bands.iter().copied()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use spectab_band::{Allocation, Bounds};
    use spectab_core::Jurisdiction;

    fn band(range: &str) -> Band {
        Band::builder(Bounds::parse(range, None).unwrap())
            .jurisdiction(Jurisdiction::ItuRegion1)
            .primary(Allocation::parse("FIXED").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn text_is_one_line_per_band() {
        let a = band("1-2 MHz");
        let b = band("2-3 MHz");
        let text = bands_text([&a, &b]);
        assert_eq!(text.lines().collect::<Vec<_>>(), [a.compact_str(), b.compact_str()]);
        assert_eq!(text.lines().next(), Some("1-2 MHz [ITU Region 1]/FIXED"));
    }

    #[test]
    fn json_lists_bands() {
        let a = band("1-2 MHz");
        let rendered = json(&[&a][..]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(1));
        assert_eq!(value[0]["jurisdictions"][0], "ITU-R1");
    }
}
