//! Répartition des items Wikidata selon leurs références OSM
//!
//! Un item peut porter plusieurs références (node, way, relation): il est alors
//! ajouté à chacune des listes correspondantes, sans dédoublonnage.

use serde::Serialize;

use crate::error::WdqsError;
use crate::query::{VAR_ITEM, VAR_LABEL, VAR_NODE, VAR_RELATION, VAR_WAY};
use crate::types::{Binding, EntityRecord};

/// Extrait l'identifiant Wikidata d'une URI d'entité
///
/// `http://www.wikidata.org/entity/Q12345` -> `Q12345`
pub fn entity_id_from_uri(uri: &str) -> &str {
    uri.rsplit('/').next().unwrap_or(uri)
}

impl EntityRecord {
    /// Construit un enregistrement depuis une ligne de résultat SPARQL
    ///
    /// # Errors
    /// Retourne [`WdqsError::MissingVariable`] si `?item` n'est pas lié
    pub fn from_binding(binding: &Binding) -> Result<Self, WdqsError> {
        let item = binding
            .get(VAR_ITEM)
            .ok_or_else(|| WdqsError::missing_variable(VAR_ITEM))?;
        let value = |var: &str| binding.get(var).map(|term| term.value.clone());

        Ok(Self {
            id: entity_id_from_uri(&item.value).to_string(),
            label: value(VAR_LABEL),
            node_ref: value(VAR_NODE),
            way_ref: value(VAR_WAY),
            relation_ref: value(VAR_RELATION),
        })
    }
}

/// Identifiants Wikidata regroupés par type de référence OSM
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub nodes: Vec<String>,
    pub ways: Vec<String>,
    pub relations: Vec<String>,
}

impl Classification {
    /// Ways puis relations, pour les tables qui ne distinguent pas les deux
    pub fn ways_and_relations(&self) -> Vec<String> {
        let mut ids = Vec::with_capacity(self.ways.len() + self.relations.len());
        ids.extend(self.ways.iter().cloned());
        ids.extend(self.relations.iter().cloned());
        ids
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.ways.is_empty() && self.relations.is_empty()
    }
}

/// Classe les items selon les références liées, dans l'ordre des résultats
pub fn classify<'a, I>(records: I) -> Classification
where
    I: IntoIterator<Item = &'a EntityRecord>,
{
    let mut classification = Classification::default();

    for record in records {
        if record.node_ref.is_some() {
            classification.nodes.push(record.id.clone());
        }
        if record.way_ref.is_some() {
            classification.ways.push(record.id.clone());
        }
        if record.relation_ref.is_some() {
            classification.relations.push(record.id.clone());
        }
    }

    classification
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RdfTerm;

    fn uri(value: &str) -> RdfTerm {
        RdfTerm {
            kind: "uri".into(),
            value: value.into(),
            lang: None,
            datatype: None,
        }
    }

    fn literal(value: &str) -> RdfTerm {
        RdfTerm {
            kind: "literal".into(),
            value: value.into(),
            lang: None,
            datatype: None,
        }
    }

    fn record(id: &str, node: bool, way: bool, relation: bool) -> EntityRecord {
        EntityRecord {
            id: id.into(),
            label: None,
            node_ref: node.then(|| "1".to_string()),
            way_ref: way.then(|| "2".to_string()),
            relation_ref: relation.then(|| "3".to_string()),
        }
    }

    #[test]
    fn test_entity_id_from_uri() {
        assert_eq!(
            entity_id_from_uri("http://www.wikidata.org/entity/Q12345"),
            "Q12345"
        );
        assert_eq!(entity_id_from_uri("Q42"), "Q42");
        assert_eq!(entity_id_from_uri("http://example.org/"), "");
    }

    #[test]
    fn test_from_binding_all_fields() {
        let mut binding = Binding::new();
        binding.insert("item".into(), uri("http://www.wikidata.org/entity/Q1050826"));
        binding.insert("itemLabel".into(), literal("Tsim Sha Tsui"));
        binding.insert("osmrelation".into(), literal("8484916"));

        let record = EntityRecord::from_binding(&binding).unwrap();
        assert_eq!(record.id, "Q1050826");
        assert_eq!(record.label.as_deref(), Some("Tsim Sha Tsui"));
        assert_eq!(record.node_ref, None);
        assert_eq!(record.way_ref, None);
        assert_eq!(record.relation_ref.as_deref(), Some("8484916"));
    }

    #[test]
    fn test_from_binding_missing_item() {
        let mut binding = Binding::new();
        binding.insert("osmid".into(), literal("42"));

        let err = EntityRecord::from_binding(&binding).unwrap_err();
        assert!(matches!(err, WdqsError::MissingVariable { ref variable } if variable == "item"));
    }

    #[test]
    fn test_classify_empty() {
        let classification = classify(&Vec::<EntityRecord>::new());
        assert!(classification.is_empty());
        assert!(classification.ways_and_relations().is_empty());
    }

    #[test]
    fn test_classify_buckets() {
        let records = vec![
            record("Q1", true, false, false),
            record("Q2", false, true, false),
            record("Q3", false, false, true),
        ];
        let classification = classify(&records);

        assert_eq!(classification.nodes, vec!["Q1"]);
        assert_eq!(classification.ways, vec!["Q2"]);
        assert_eq!(classification.relations, vec!["Q3"]);
    }

    #[test]
    fn test_classify_multiple_references_not_deduplicated() {
        let records = vec![
            record("Q10", true, true, true),
            record("Q11", false, true, false),
            record("Q11", false, true, false),
        ];
        let classification = classify(&records);

        assert_eq!(classification.nodes, vec!["Q10"]);
        assert_eq!(classification.ways, vec!["Q10", "Q11", "Q11"]);
        assert_eq!(classification.relations, vec!["Q10"]);
    }

    #[test]
    fn test_ways_and_relations_order() {
        let records = vec![
            record("Q999", false, false, true),
            record("Q12345", false, true, false),
        ];
        let classification = classify(&records);

        assert_eq!(classification.ways_and_relations(), vec!["Q12345", "Q999"]);
    }
}
