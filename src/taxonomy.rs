use std::collections::BTreeSet;
use std::sync::RwLock;

/// Built-in label variants per canonical concept, loaded by
/// [`ConceptTaxonomy::seeded`]. Everything is stored lowercase.
const SEED: &[(&str, &[&str])] = &[
    (
        "revenue",
        &[
            "revenue",
            "revenues",
            "total revenue",
            "total net sales",
            "net sales",
            "net revenues",
            "sales",
        ],
    ),
    (
        "cost of revenue",
        &[
            "cost of revenue",
            "cost of sales",
            "cost of goods sold",
            "cost of products sold",
        ],
    ),
    ("gross profit", &["gross profit", "gross margin"]),
    (
        "operating expenses",
        &[
            "operating expenses",
            "total operating expenses",
            "costs and expenses",
        ],
    ),
    (
        "operating income",
        &[
            "operating income",
            "operating income (loss)",
            "income from operations",
            "operating profit",
        ],
    ),
    (
        "net income",
        &[
            "net income",
            "net income (loss)",
            "net earnings",
            "profit for the year",
        ],
    ),
    (
        "research and development",
        &["research and development", "research and development expenses"],
    ),
    (
        "selling general and administrative",
        &[
            "selling, general and administrative",
            "selling, general and administrative expenses",
            "sg&a",
        ],
    ),
    (
        "income tax expense",
        &["income tax expense", "provision for income taxes", "income taxes"],
    ),
    ("interest expense", &["interest expense", "interest expense, net"]),
];

/// Process-wide store of canonical concept -> known label variants.
///
/// Internally an append-only log of (category, label) pairs; duplicates
/// that slip in through concurrent `learn` calls are removed at read
/// time, so entries are never lost or corrupted. The store is injected
/// wherever it is needed rather than living behind a global, which keeps
/// tests isolated. Nothing is persisted across process restarts.
///
/// The matcher does not consult this store yet; today it only records
/// which labels the extraction step has mapped to which concepts.
pub struct ConceptTaxonomy {
    log: RwLock<Vec<(String, String)>>,
}

impl ConceptTaxonomy {
    pub fn new() -> Self {
        ConceptTaxonomy {
            log: RwLock::new(Vec::new()),
        }
    }

    /// A taxonomy preloaded with the built-in variant table.
    pub fn seeded() -> Self {
        let taxonomy = Self::new();
        for (category, labels) in SEED {
            for label in *labels {
                taxonomy.learn(category, label);
            }
        }
        taxonomy
    }

    /// Records that `label` was classified as `category`. Both sides are
    /// lowercased. Appends only when the pair is not already visible; a
    /// concurrent race can at worst append a duplicate, which `variants`
    /// hides. There is no removal.
    pub fn learn(&self, category: &str, label: &str) {
        let category = category.to_lowercase();
        let label = label.to_lowercase();
        {
            let log = self.log.read().unwrap();
            if log.iter().any(|(c, l)| *c == category && *l == label) {
                return;
            }
        }
        log::debug!("taxonomy: learned {:?} -> {:?}", category, label);
        self.log.write().unwrap().push((category, label));
    }

    /// Deduplicated snapshot of the known variants for a concept.
    pub fn variants(&self, category: &str) -> BTreeSet<String> {
        let category = category.to_lowercase();
        self.log
            .read()
            .unwrap()
            .iter()
            .filter(|(c, _)| *c == category)
            .map(|(_, l)| l.clone())
            .collect()
    }

    /// Total number of logged pairs, duplicates included.
    pub fn len(&self) -> usize {
        self.log.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.read().unwrap().is_empty()
    }
}

impl Default for ConceptTaxonomy {
    fn default() -> Self {
        Self::new()
    }
}
