use crate::common::constants::{CATALOG_PATCH_COLUMN, CATALOG_REGIONS_COLUMN};
use crate::common::error::{CatalogError, Result};
use crate::common::types::{PatchId, RegionId};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// One catalog line: a patch and every NOAA region it was associated with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchEntry {
    pub patch_id: PatchId,
    pub regions: BTreeSet<u32>,
}

/// Region → patch lookup table, rows kept in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionPatchMap {
    entries: Vec<PatchEntry>,
}

impl RegionPatchMap {
    pub fn from_entries(entries: Vec<PatchEntry>) -> Self {
        Self { entries }
    }

    /// Parses the whitespace-delimited HARP/NOAA table.
    ///
    /// The first non-blank line is the header; the patch and region columns are
    /// located by name. Region cells hold comma-separated NOAA numbers.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let (_, header) = lines
            .next()
            .ok_or_else(|| CatalogError::Catalog("catalog is empty".into()))?;
        let columns: Vec<&str> = header.split_whitespace().collect();
        let column = |name: &str| {
            columns
                .iter()
                .position(|c| c.eq_ignore_ascii_case(name))
                .ok_or_else(|| CatalogError::Catalog(format!("header is missing column {name}")))
        };
        let patch_col = column(CATALOG_PATCH_COLUMN)?;
        let regions_col = column(CATALOG_REGIONS_COLUMN)?;

        let mut entries = Vec::new();
        for (index, line) in lines {
            let cells: Vec<&str> = line.split_whitespace().collect();
            let line_no = index + 1;

            let patch_id: PatchId = cells
                .get(patch_col)
                .and_then(|c| c.parse().ok())
                .ok_or_else(|| {
                    CatalogError::Catalog(format!("line {line_no}: invalid patch id in '{line}'"))
                })?;

            let regions: BTreeSet<u32> = cells
                .get(regions_col)
                .map(|cell| {
                    cell.split(',')
                        .filter_map(|token| token.trim().parse().ok())
                        .filter(|&n: &u32| n != 0)
                        .collect()
                })
                .unwrap_or_default();

            entries.push(PatchEntry { patch_id, regions });
        }

        info!("Loaded region catalog with {} patches", entries.len());
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PatchEntry] {
        &self.entries
    }
}

/// Maps NOAA active regions to spatial patches.
pub struct RegionResolver {
    map: RegionPatchMap,
}

impl RegionResolver {
    pub fn new(map: RegionPatchMap) -> Self {
        Self { map }
    }

    /// Returns the first patch (in catalog order) listing the region, or `None`.
    /// Events without an associated region never consult the catalog.
    pub fn resolve(&self, region: &RegionId) -> Option<PatchId> {
        let number = match region {
            RegionId::None => return None,
            RegionId::Noaa(n) => *n,
        };

        let found = self
            .map
            .entries
            .iter()
            .find(|entry| entry.regions.contains(&number))
            .map(|entry| entry.patch_id);

        debug!(region = number, patch = ?found, "Resolved region");
        found
    }

    pub fn catalog(&self) -> &RegionPatchMap {
        &self.map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = "HARPNUM NOAA_ARS\n\
                           1 11059\n\
                           2 11058\n\
                           8 11067,11068\n\
                           \n\
                           401 11158\n\
                           402 11158,11160\n";

    #[test]
    fn test_parse_catalog() {
        let map = RegionPatchMap::parse(CATALOG).unwrap();
        assert_eq!(map.len(), 5);
        assert_eq!(map.entries()[2].patch_id, 8);
        assert!(map.entries()[2].regions.contains(&11068));
    }

    #[test]
    fn test_parse_finds_columns_by_name() {
        let map = RegionPatchMap::parse("NOAA_ARS HARPNUM\n11158,11159 401\n").unwrap();
        assert_eq!(map.entries()[0].patch_id, 401);
        assert_eq!(map.entries()[0].regions.len(), 2);
    }

    #[test]
    fn test_parse_rejects_bad_rows() {
        assert!(matches!(
            RegionPatchMap::parse("HARPNUM NOAA_ARS\nabc 11158\n"),
            Err(CatalogError::Catalog(_))
        ));
        assert!(matches!(
            RegionPatchMap::parse("PATCH REGIONS\n1 2\n"),
            Err(CatalogError::Catalog(_))
        ));
        assert!(RegionPatchMap::parse("   \n").is_err());
    }

    #[test]
    fn test_resolve_first_match_in_catalog_order() {
        let resolver = RegionResolver::new(RegionPatchMap::parse(CATALOG).unwrap());
        assert_eq!(resolver.resolve(&RegionId::Noaa(11158)), Some(401));
        assert_eq!(resolver.resolve(&RegionId::Noaa(11160)), Some(402));
        assert_eq!(resolver.resolve(&RegionId::Noaa(11068)), Some(8));
    }

    #[test]
    fn test_resolve_does_not_match_partial_numbers() {
        let resolver = RegionResolver::new(RegionPatchMap::parse(CATALOG).unwrap());
        assert_eq!(resolver.resolve(&RegionId::Noaa(115)), None);
        assert_eq!(resolver.resolve(&RegionId::Noaa(1158)), None);
        assert_eq!(resolver.resolve(&RegionId::Noaa(99999)), None);
    }

    #[test]
    fn test_resolve_no_region_is_unresolved() {
        let resolver = RegionResolver::new(RegionPatchMap::parse(CATALOG).unwrap());
        assert_eq!(resolver.resolve(&RegionId::None), None);

        // Even a catalog that lists region 0 does not resolve it
        let map = RegionPatchMap::from_entries(vec![PatchEntry {
            patch_id: 7,
            regions: BTreeSet::from([0]),
        }]);
        assert_eq!(RegionResolver::new(map).resolve(&RegionId::None), None);
    }
}
