//! Client-side reconstruction of linked transfer pairs.
//!
//! The backend flags each leg of a transfer with `is_transfer` and points it at
//! its counterpart via `linked_tx_id`. Pairs are a pure projection of one
//! snapshot of records: recomputed on every load and never stored.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::transaction::TransactionRecord;

/// Two records linked as one transfer.
///
/// `source` is whichever leg appeared first in the input. It is not
/// necessarily the debit leg; use [`TransferPair::legs`] for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferPair {
    pub source: TransactionRecord,
    pub target: TransactionRecord,
}

/// Debit and credit side of a pair, as shown to the user
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferLegs<'a> {
    pub debit: &'a TransactionRecord,
    pub credit: &'a TransactionRecord,
}

impl TransferPair {
    /// Split the pair into debit (negative) and credit (non-negative) legs.
    /// When both legs share a sign, source is treated as debit.
    pub fn legs(&self) -> TransferLegs<'_> {
        let (source, target) = (&self.source, &self.target);
        if target.is_debit() && !source.is_debit() {
            TransferLegs {
                debit: target,
                credit: source,
            }
        } else {
            TransferLegs {
                debit: source,
                credit: target,
            }
        }
    }

    /// Id sent to the unlink endpoint for this pair
    pub fn unlink_id(&self) -> &str {
        &self.source.id
    }

    pub fn contains(&self, id: &str) -> bool {
        self.source.id == id || self.target.id == id
    }
}

/// Group transfer-flagged records into disjoint pairs.
///
/// Records without the transfer flag or without a link are ignored. A record
/// whose link resolves to nothing in `records` (or to itself, or to a record
/// already paired) is dropped. Pairs come out in input order of their source.
pub fn resolve_pairs(records: &[TransactionRecord]) -> Vec<TransferPair> {
    let candidates: Vec<(&TransactionRecord, &str)> = records
        .iter()
        .filter_map(|r| r.transfer_link().map(|link| (r, link)))
        .collect();

    // first record wins when an id repeats
    let mut by_id: HashMap<&str, &TransactionRecord> = HashMap::with_capacity(candidates.len());
    for &(rec, _) in &candidates {
        by_id.entry(rec.id.as_str()).or_insert(rec);
    }

    let mut consumed: HashSet<&str> = HashSet::new();
    let mut pairs = Vec::new();

    for (rec, link) in candidates {
        if consumed.contains(rec.id.as_str()) || link == rec.id {
            continue;
        }
        let Some(&partner) = by_id.get(link) else {
            continue;
        };
        if consumed.contains(partner.id.as_str()) {
            continue;
        }
        consumed.insert(rec.id.as_str());
        consumed.insert(partner.id.as_str());
        pairs.push(TransferPair {
            source: rec.clone(),
            target: partner.clone(),
        });
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leg(id: &str, linked: &str, amount: f64) -> TransactionRecord {
        TransactionRecord::new(id, "2025-02-01", format!("leg {id}"), amount).linked_to(linked)
    }

    fn plain(id: &str, amount: f64) -> TransactionRecord {
        TransactionRecord::new(id, "2025-02-01", format!("txn {id}"), amount)
    }

    fn ids(pairs: &[TransferPair]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|p| (p.source.id.clone(), p.target.id.clone()))
            .collect()
    }

    #[test]
    fn test_basic_pair_skips_non_transfers() {
        let records = vec![leg("1", "2", -50.0), leg("2", "1", 50.0), plain("3", -12.0)];
        let pairs = resolve_pairs(&records);
        assert_eq!(ids(&pairs), vec![("1".to_string(), "2".to_string())]);
        assert!(!pairs.iter().any(|p| p.contains("3")));
    }

    #[test]
    fn test_dangling_link_dropped() {
        let records = vec![leg("5", "9", -20.0), plain("6", 3.0)];
        assert!(resolve_pairs(&records).is_empty());
    }

    #[test]
    fn test_order_decides_source() {
        let records = vec![leg("b", "a", 50.0), leg("a", "b", -50.0)];
        let pairs = resolve_pairs(&records);
        assert_eq!(ids(&pairs), vec![("b".to_string(), "a".to_string())]);
    }

    #[test]
    fn test_partner_must_be_flagged() {
        // the counterpart exists but is not marked as a transfer
        let records = vec![leg("1", "2", -50.0), plain("2", 50.0)];
        assert!(resolve_pairs(&records).is_empty());
    }

    #[test]
    fn test_self_link_dropped() {
        let records = vec![leg("1", "1", -50.0)];
        assert!(resolve_pairs(&records).is_empty());
    }

    #[test]
    fn test_pairs_are_disjoint() {
        // c also points at b, but b is already taken by a
        let records = vec![
            leg("a", "b", -10.0),
            leg("b", "a", 10.0),
            leg("c", "b", -10.0),
            leg("d", "e", -7.5),
            leg("e", "d", 7.5),
        ];
        let pairs = resolve_pairs(&records);
        assert_eq!(
            ids(&pairs),
            vec![
                ("a".to_string(), "b".to_string()),
                ("d".to_string(), "e".to_string())
            ]
        );

        let mut seen = HashSet::new();
        for p in &pairs {
            assert!(seen.insert(p.source.id.clone()));
            assert!(seen.insert(p.target.id.clone()));
        }
    }

    #[test]
    fn test_one_sided_link_still_pairs() {
        // mutual links are expected but not verified
        let records = vec![leg("1", "2", -40.0), leg("2", "7", 40.0)];
        let pairs = resolve_pairs(&records);
        assert_eq!(ids(&pairs), vec![("1".to_string(), "2".to_string())]);
    }

    #[test]
    fn test_idempotent() {
        let records = vec![
            leg("x", "y", -1.0),
            plain("z", 4.0),
            leg("y", "x", 1.0),
            leg("q", "missing", -3.0),
        ];
        assert_eq!(resolve_pairs(&records), resolve_pairs(&records));
    }

    #[test]
    fn test_untidy_server_records_still_pair() {
        let json = r#"[
            {"_id": 1, "date": null, "amount": -50, "is_transfer": true, "linked_tx_id": 2},
            {"_id": 2, "date": "2025-02-01", "amount": 50, "is_transfer": true, "linked_tx_id": 1},
            {"_id": "3", "is_transfer": true, "linked_tx_id": 42},
            {"_id": "4", "is_transfer": true, "linked_tx_id": ["x"]},
            {"_id": "5", "description": null, "amount": null, "is_transfer": null}
        ]"#;
        let records: Vec<TransactionRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 5);

        let pairs = resolve_pairs(&records);
        assert_eq!(ids(&pairs), vec![("1".to_string(), "2".to_string())]);
        assert_eq!(pairs[0].source.date, "");
    }

    #[test]
    fn test_legs_by_sign() {
        let pair = TransferPair {
            source: leg("1", "2", 50.0),
            target: leg("2", "1", -50.0),
        };
        let legs = pair.legs();
        assert_eq!(legs.debit.id, "2");
        assert_eq!(legs.credit.id, "1");
        assert_eq!(pair.unlink_id(), "1");

        let normal = TransferPair {
            source: leg("1", "2", -50.0),
            target: leg("2", "1", 50.0),
        };
        assert_eq!(normal.legs().debit.id, "1");
    }

    #[test]
    fn test_legs_same_sign_falls_back_to_order() {
        let both_negative = TransferPair {
            source: leg("1", "2", -50.0),
            target: leg("2", "1", -50.0),
        };
        assert_eq!(both_negative.legs().debit.id, "1");

        let both_positive = TransferPair {
            source: leg("1", "2", 50.0),
            target: leg("2", "1", 0.0),
        };
        assert_eq!(both_positive.legs().debit.id, "1");
        assert_eq!(both_positive.legs().credit.id, "2");
    }
}
