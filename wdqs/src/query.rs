//! Construction de la requête SPARQL "items situés dans un lieu"

use crate::types::Qid;

/// Propriété "located in the administrative territorial entity"
pub const P_ADMIN_CONTAINMENT: &str = "P131";
/// Propriété "OpenStreetMap node ID"
pub const P_OSM_NODE: &str = "P11693";
/// Propriété "OpenStreetMap identifier"
pub const P_OSM_WAY: &str = "P402";
/// Propriété "OpenStreetMap relation ID"
pub const P_OSM_RELATION: &str = "P10689";

/// Variables SPARQL projetées
pub const VAR_ITEM: &str = "item";
pub const VAR_LABEL: &str = "itemLabel";
pub const VAR_NODE: &str = "osmid";
pub const VAR_WAY: &str = "osmway";
pub const VAR_RELATION: &str = "osmrelation";

/// Construit la requête listant les items administrativement situés dans `place`
/// et portant au moins une référence OSM (node, way ou relation).
pub fn build_place_query(place: &Qid) -> String {
    format!(
        r#"SELECT ?{item} ?{label} ?{node} ?{way} ?{relation} WHERE {{
  ?{item} wdt:{within} wd:{place}.
  OPTIONAL {{ ?{item} wdt:{p_node} ?{node}. }}
  OPTIONAL {{ ?{item} wdt:{p_way} ?{way}. }}
  OPTIONAL {{ ?{item} wdt:{p_relation} ?{relation}. }}
  FILTER(BOUND(?{node}) || BOUND(?{relation}) || BOUND(?{way}))
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "[AUTO_LANGUAGE],en". }}
}}"#,
        item = VAR_ITEM,
        label = VAR_LABEL,
        node = VAR_NODE,
        way = VAR_WAY,
        relation = VAR_RELATION,
        within = P_ADMIN_CONTAINMENT,
        place = place,
        p_node = P_OSM_NODE,
        p_way = P_OSM_WAY,
        p_relation = P_OSM_RELATION,
    )
}
