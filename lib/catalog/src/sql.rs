//! SQL payload for the storefront database
//!
//! The similar-products property is a multiple-value property: one row per
//! `(product, similar product)` pair in the multi-value table, plus a PHP
//! serialized copy of the whole list in the product's single-row table. The
//! payload clears the property, inserts the pairs in preference order and
//! rebuilds the serialized column from them.

use serde::{Deserialize, Serialize};
use smartsimilar_similarity::RankedResult;
use std::fmt::Write;

/// Tables and property receiving the similar-products list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlTarget {
    /// Multi-value property table, one row per value
    pub multi_table: String,
    /// Single-row property table holding the serialized list
    pub single_table: String,
    pub property_id: u32,
}

impl Default for SqlTarget {
    fn default() -> Self {
        Self {
            multi_table: "b_iblock_element_prop_m5".to_string(),
            single_table: "b_iblock_element_prop_s5".to_string(),
            property_id: 122,
        }
    }
}

// Ranks rows by insertion id so the serialized list keeps preference order
const REBUILD_TEMPLATE: &str = r#"UPDATE $SINGLE s
JOIN (
  SELECT
    r.IBLOCK_ELEMENT_ID
  , CONCAT(
      'a:3:{s:5:"VALUE";a:', COUNT(*), ':{'
      , GROUP_CONCAT(CONCAT('i:', r.rn - 1, ';s:', CHAR_LENGTH(CAST(r.VALUE AS CHAR)), ':"', CAST(r.VALUE AS CHAR), '";') ORDER BY r.rn SEPARATOR '')
      , '}s:11:"DESCRIPTION";a:', COUNT(*), ':{'
      , GROUP_CONCAT(CONCAT('i:', r.rn - 1, ';s:0:"";') ORDER BY r.rn SEPARATOR '')
      , '}s:2:"ID";a:', COUNT(*), ':{'
      , GROUP_CONCAT(CONCAT('i:', r.rn - 1, ';s:', CHAR_LENGTH(CAST(r.ID AS CHAR)), ':"', CAST(r.ID AS CHAR), '";') ORDER BY r.rn SEPARATOR '')
      , '}}'
    ) prop
  FROM
  (
    SELECT a.IBLOCK_ELEMENT_ID, a.VALUE, a.ID, COUNT(*) AS rn
    FROM $MULTI a
    JOIN $MULTI b ON a.IBLOCK_ELEMENT_ID = b.IBLOCK_ELEMENT_ID AND a.ID >= b.ID
    WHERE a.IBLOCK_PROPERTY_ID = $PROP AND b.IBLOCK_PROPERTY_ID = $PROP
    GROUP BY a.IBLOCK_ELEMENT_ID, a.VALUE, a.ID
  ) r
  GROUP BY r.IBLOCK_ELEMENT_ID
) f ON s.IBLOCK_ELEMENT_ID = f.IBLOCK_ELEMENT_ID
SET s.PROPERTY_$PROP = f.prop;
"#;

/// Render the full SQL payload for a result set
pub fn render_sql(results: &[RankedResult], target: &SqlTarget) -> String {
    let mut sql = String::new();
    let prop = target.property_id;

    // Writing into a String cannot fail
    let _ = writeln!(
        sql,
        "DELETE FROM {} WHERE IBLOCK_PROPERTY_ID = {};",
        target.multi_table, prop
    );
    sql.push('\n');

    for result in results {
        for similar in result.similar_ids() {
            let _ = writeln!(
                sql,
                "INSERT {}(IBLOCK_ELEMENT_ID,IBLOCK_PROPERTY_ID,VALUE,VALUE_NUM) VALUES ({}, {}, {}, {});",
                target.multi_table,
                result.source_id(),
                prop,
                similar,
                similar
            );
        }
    }
    sql.push('\n');

    sql.push_str(
        &REBUILD_TEMPLATE
            .replace("$SINGLE", &target.single_table)
            .replace("$MULTI", &target.multi_table)
            .replace("$PROP", &prop.to_string()),
    );

    sql
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_inserts_in_result_order() {
        let results = vec![
            RankedResult::new(10, vec![12, 11]),
            RankedResult::new(11, vec![]),
            RankedResult::new(12, vec![10]),
        ];
        let sql = render_sql(&results, &SqlTarget::default());
        let lines: Vec<&str> = sql.lines().collect();

        assert_eq!(lines[0], "DELETE FROM b_iblock_element_prop_m5 WHERE IBLOCK_PROPERTY_ID = 122;");
        assert_eq!(
            lines[2],
            "INSERT b_iblock_element_prop_m5(IBLOCK_ELEMENT_ID,IBLOCK_PROPERTY_ID,VALUE,VALUE_NUM) VALUES (10, 122, 12, 12);"
        );
        assert!(lines[3].contains("VALUES (10, 122, 11, 11)"));
        assert!(lines[4].contains("VALUES (12, 122, 10, 10)"));
        assert_eq!(sql.matches("INSERT ").count(), 3);
    }

    #[test]
    fn test_custom_target() {
        let target = SqlTarget {
            multi_table: "props_multi".to_string(),
            single_table: "props_single".to_string(),
            property_id: 7,
        };
        let sql = render_sql(&[RankedResult::new(1, vec![2])], &target);

        assert!(sql.starts_with("DELETE FROM props_multi WHERE IBLOCK_PROPERTY_ID = 7;"));
        assert!(sql.contains("UPDATE props_single s"));
        assert!(sql.contains("SET s.PROPERTY_7 = f.prop;"));
        assert!(!sql.contains('$'));
        assert!(!sql.contains("122"));
    }
}
