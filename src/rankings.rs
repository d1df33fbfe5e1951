// 🏆 City Rankings - Static cost-of-living index table
// Loaded once at startup from a tab-separated file and served as-is
//
// A row needs a rank and a city name. Index columns that don't parse are
// kept as `None` (serialized as `null`) instead of dropping the row.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// How many cities each of the expensive / cheapest lists shows.
pub const HEADLINE_COUNT: usize = 5;

const COLUMN_COUNT: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRanking {
    pub rank: u32,
    pub city: String,
    pub col_index: Option<f64>,
    pub rent_index: Option<f64>,
    pub col_plus_rent_index: Option<f64>,
    pub groceries_index: Option<f64>,
    pub restaurant_index: Option<f64>,
    pub lpp_index: Option<f64>,
}

impl CityRanking {
    fn from_record(record: &csv::StringRecord) -> Option<Self> {
        if record.len() < COLUMN_COUNT {
            return None;
        }
        let num = |i: usize| record.get(i).and_then(|v| v.trim().parse::<f64>().ok());

        Some(CityRanking {
            rank: record.get(0)?.trim().parse().ok()?,
            city: record.get(1)?.trim().to_string(),
            col_index: num(2),
            rent_index: num(3),
            col_plus_rent_index: num(4),
            groceries_index: num(5),
            restaurant_index: num(6),
            lpp_index: num(7),
        })
    }
}

/// Rankings - Headline lists plus the full table, in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rankings {
    pub expensive: Vec<CityRanking>,
    pub cheapest: Vec<CityRanking>,
    pub all: Vec<CityRanking>,
}

impl Rankings {
    /// Build the listing from rows ordered most → least expensive
    pub fn from_rows(all: Vec<CityRanking>) -> Self {
        let expensive = all.iter().take(HEADLINE_COUNT).cloned().collect();
        let cheapest = all.iter().rev().take(HEADLINE_COUNT).cloned().collect();
        Rankings {
            expensive,
            cheapest,
            all,
        }
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// Parse the tab-separated index table (first line is a header)
///
/// Short rows, and rows without a numeric rank, are skipped.
pub fn parse_rankings<R: Read>(reader: R) -> Result<Rankings> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.context("Failed to read rankings row")?;
        if let Some(row) = CityRanking::from_record(&record) {
            rows.push(row);
        }
    }

    Ok(Rankings::from_rows(rows))
}

/// Load the rankings file from disk
pub fn load_rankings(path: &Path) -> Result<Rankings> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open rankings file: {:?}", path))?;
    parse_rankings(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "Rank\tCity\tCost of Living Index\tRent Index\tCost of Living Plus Rent Index\tGroceries Index\tRestaurant Price Index\tLocal Purchasing Power Index
1\tHamilton, Bermuda\t132.0\t96.0\t114.9\t129.0\t136.6\t113.4
2\tZurich, Switzerland\t118.3\t63.0\t92.0\t114.9\t114.0\t138.3
3\tBasel, Switzerland\t112.0\t46.1\t80.6\t109.8\t109.6\t136.7
4\tLausanne, Switzerland\t111.4\t49.8\t82.1\t111.2\t105.4\t124.5
5\tNew York, NY, United States\t100.0\t100.0\t100.0\t100.0\t100.0\t100.0
6\tSan Francisco, CA, United States\t93.8\t99.5\t96.5\t96.7\t87.4\t136.9
7\tKarachi, Pakistan\t18.9\t2.8\t11.2\t15.6\t14.9\t25.8
broken\trow
8\tLahore, Pakistan\tn/a\t2.7\t10.7\t14.5\t13.6\t28.3
";

    #[test]
    fn test_parse_rows() {
        let rankings = parse_rankings(TABLE.as_bytes()).unwrap();

        assert_eq!(rankings.len(), 8);
        assert_eq!(rankings.all[0].rank, 1);
        assert_eq!(rankings.all[0].city, "Hamilton, Bermuda");
        assert_eq!(rankings.all[0].col_index, Some(132.0));
        assert_eq!(rankings.all[0].lpp_index, Some(113.4));
    }

    #[test]
    fn test_unparseable_index_keeps_row() {
        let rankings = parse_rankings(TABLE.as_bytes()).unwrap();
        let lahore = rankings.all.last().unwrap();

        assert_eq!(lahore.rank, 8);
        assert_eq!(lahore.city, "Lahore, Pakistan");
        assert_eq!(lahore.col_index, None);
        assert_eq!(lahore.rent_index, Some(2.7));

        let json = serde_json::to_value(lahore).unwrap();
        assert!(json["col_index"].is_null());
    }

    #[test]
    fn test_headline_lists() {
        let rankings = parse_rankings(TABLE.as_bytes()).unwrap();

        let expensive: Vec<u32> = rankings.expensive.iter().map(|r| r.rank).collect();
        let cheapest: Vec<u32> = rankings.cheapest.iter().map(|r| r.rank).collect();

        assert_eq!(expensive, vec![1, 2, 3, 4, 5]);
        assert_eq!(cheapest, vec![8, 7, 6, 5, 4]);
    }

    #[test]
    fn test_short_table() {
        let rankings = Rankings::from_rows(Vec::new());
        assert!(rankings.is_empty());
        assert!(rankings.expensive.is_empty());
        assert!(rankings.cheapest.is_empty());
    }

    #[test]
    fn test_missing_file() {
        assert!(load_rankings(Path::new("/definitely/not/here.txt")).is_err());
    }
}
