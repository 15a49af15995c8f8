//! The fixed product catalog and the order-form alias table.
//!
//! Both are static configuration: the catalog decides which products the
//! summary covers and which empty records get seeded, the alias table decides
//! which order-form lines map to which product.

/// Canonical product names, in display order.
pub const CATALOG: &[&str] = &[
  "Lignes à sang",
  "K7 Ergo Flow",
  "K7 FLOW",
  "Dialyseurs",
  "Dialysats",
  "Sodium",
  "Chlorexydine",
  "Aiguilles à fistules",
  "Rallonges aiguilles",
  "Kits de ponctions",
  "Tuyau extentions",
  "Raccords Y",
  "Seringues 20 ml",
  "Enoxaparine",
  "Seringues 10 ml",
];

/// A mapping from canonical name to the label variants used for it in the
/// supplier's order form.
pub type AliasTable = &'static [(&'static str, &'static [&'static str])];

/// Labels as they appear in the supplier's order form. Matching is exact
/// after trimming, ignoring case. `Chlorexydine` is not on the form.
pub const ALIASES: AliasTable = &[
  ("Lignes à sang", &["PHYSIDIA LIGNES A SANG A-V PHYSILINE (1/RA)"]),
  ("K7 Ergo Flow", &[
    "PHYSIDIA CASSETTE dialysat PHYSI.FLOW. ERGO (1 pour 2 RA soit 3/semaine)",
  ]),
  ("K7 FLOW", &[
    "PHYSIDIA CASSETTE dialysat PHYSI.FLOW : avoir toujours 5 unités en stock",
  ]),
  ("Dialyseurs", &["DIALYSEUR FX60 (1/RA)"]),
  ("Dialysats", &["PHYSIDIA DIALYSAT K1 5L/poche (5 poches/RA)"]),
  ("Sodium", &["SODIUM CHL.0.9% emoluer 2 litres (1/RA)"]),
  ("Aiguilles à fistules", &["AIG.PLUME V16G-R20-R (Fresenius) (2/RA)"]),
  ("Rallonges aiguilles", &["RACCORD FISTULE LG200 (Hémodia) ( 2/RA)"]),
  ("Kits de ponctions", &["SET DIALYSE FISTULE medium 7/8 (1/RA)"]),
  ("Tuyau extentions", &["PHYSIDIA LIGNE EXTENSION 3m (2/RA)"]),
  ("Raccords Y", &["RACCORD Y pour UNIPONCTURE (1/RA)"]),
  ("Seringues 20 ml", &["SERINGUE 20ML", "SERINGUE 20", "SERINGUES 20"]),
  ("Enoxaparine", &["ENOXAPARINE 2 000 UI/0,2 ml seringue (1/RA)"]),
  ("Seringues 10 ml", &["SERINGUE 10ML", "SERINGUE 10", "SERINGUES 10"]),
];

/// Resolve a free-text label to its canonical product name.
///
/// The label is trimmed and compared to every alias case-insensitively;
/// no partial matching. The first canonical name whose aliases contain the
/// label wins.
pub fn resolve_alias(table: AliasTable, label: &str) -> Option<&'static str> {
  let wanted = label.trim().to_uppercase();
  table
    .iter()
    .find(|(_, aliases)| aliases.iter().any(|a| a.to_uppercase() == wanted))
    .map(|(canonical, _)| *canonical)
}

#[cfg(test)]
mod tests {
  use rstest::rstest;

  use super::*;

  #[test]
  fn every_alias_target_is_in_the_catalog() {
    for (canonical, aliases) in ALIASES {
      assert!(CATALOG.contains(canonical), "{canonical} missing from catalog");
      assert!(!aliases.is_empty());
    }
  }

  #[test]
  fn catalog_has_no_duplicates() {
    let mut names = CATALOG.to_vec();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), CATALOG.len());
  }

  #[rstest]
  #[case("SERINGUE 20ML", Some("Seringues 20 ml"))]
  #[case("  seringues 10  ", Some("Seringues 10 ml"))]
  #[case("DIALYSEUR FX60 (1/RA)", Some("Dialyseurs"))]
  #[case("raccord fistule lg200 (hémodia) ( 2/ra)", Some("Rallonges aiguilles"))]
  #[case("SERINGUE", None)]
  #[case("SERINGUE 20ML X", None)]
  #[case("", None)]
  fn resolves_labels(#[case] label: &str, #[case] expected: Option<&str>) {
    assert_eq!(resolve_alias(ALIASES, label), expected);
  }
}
