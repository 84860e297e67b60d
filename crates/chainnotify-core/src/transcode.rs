//! Wire → domain conversions.
//!
//! Every function here is pure: it validates the byte lengths and structure
//! of a wire message and either returns the domain value or a
//! [`DecodeError`]. Raw transactions are handed to Bitcoin consensus
//! decoding; nothing in this crate parses transaction encoding itself.

use bitcoin::consensus;

use crate::error::DecodeError;
use crate::types::{ChainHash, Outpoint, SpendDetail, Transaction, TxConfirmation};
use crate::wire::{BlockEpoch, ConfDetails, RpcOutpoint, SpendDetails};

/// Decode a 32-byte hash.
pub fn decode_hash(bytes: &[u8]) -> Result<ChainHash, DecodeError> {
    ChainHash::from_slice(bytes)
}

/// Encode a hash back to its wire bytes.
pub fn encode_hash(hash: &ChainHash) -> Vec<u8> {
    hash.to_vec()
}

pub fn decode_outpoint(op: &RpcOutpoint) -> Result<Outpoint, DecodeError> {
    Ok(Outpoint {
        hash: decode_hash(&op.hash)?,
        index: op.index,
    })
}

pub fn encode_outpoint(op: &Outpoint) -> RpcOutpoint {
    RpcOutpoint {
        hash: encode_hash(&op.hash),
        index: op.index,
    }
}

/// Decode a consensus-serialized transaction. Trailing bytes are rejected.
pub fn decode_tx(raw: &[u8]) -> Result<Transaction, DecodeError> {
    consensus::deserialize(raw).map_err(|e| DecodeError::Transaction(e.to_string()))
}

/// Narrow a wire height to the signed domain height.
pub fn decode_height(field: &'static str, value: u32) -> Result<i32, DecodeError> {
    i32::try_from(value).map_err(|_| DecodeError::OutOfRange { field, value })
}

pub fn decode_block_epoch(epoch: &BlockEpoch) -> Result<i32, DecodeError> {
    decode_height("height", epoch.height)
}

pub fn decode_conf_details(details: &ConfDetails) -> Result<TxConfirmation, DecodeError> {
    let tx = decode_tx(&details.raw_tx)?;
    let block_hash = decode_hash(&details.block_hash)?;
    Ok(TxConfirmation {
        block_height: details.block_height,
        block_hash,
        tx,
        tx_index: details.tx_index,
    })
}

pub fn decode_spend_details(details: &SpendDetails) -> Result<SpendDetail, DecodeError> {
    let outpoint = details
        .spending_outpoint
        .as_ref()
        .ok_or(DecodeError::MissingField("spending_outpoint"))?;
    let spent_outpoint = decode_outpoint(outpoint)?;
    let spender_tx_hash = decode_hash(&details.spending_tx_hash)?;
    let spending_tx = decode_tx(&details.raw_spending_tx)?;
    let spending_height = decode_height("spending_height", details.spending_height)?;
    Ok(SpendDetail {
        spent_outpoint,
        spender_tx_hash,
        spender_input_index: details.spending_input_index,
        spending_tx,
        spending_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::absolute::LockTime;
    use bitcoin::transaction::Version;
    use bitcoin::{Amount, OutPoint, ScriptBuf, Sequence, TxIn, TxOut, Witness};

    fn minimal_tx() -> Transaction {
        Transaction {
            version: Version::TWO,
            lock_time: LockTime::ZERO,
            input: vec![TxIn {
                previous_output: OutPoint::null(),
                script_sig: ScriptBuf::new(),
                sequence: Sequence::MAX,
                witness: Witness::new(),
            }],
            output: vec![TxOut {
                value: Amount::from_sat(50_000),
                script_pubkey: ScriptBuf::new(),
            }],
        }
    }

    #[test]
    fn hash_round_trips() {
        for seed in [0x00u8, 0x11, 0x7f, 0xff] {
            let bytes: Vec<u8> = (0..32u8).map(|i| i.wrapping_mul(seed)).collect();
            let hash = decode_hash(&bytes).unwrap();
            assert_eq!(encode_hash(&hash), bytes);
        }
    }

    #[test]
    fn hash_rejects_wrong_lengths() {
        for len in [0usize, 1, 31, 33, 64] {
            let bytes = vec![0xaa; len];
            assert_eq!(decode_hash(&bytes), Err(DecodeError::InvalidHashLength(len)));
        }
    }

    #[test]
    fn outpoint_round_trips() {
        let op = Outpoint::new(ChainHash::new([0x22; 32]), 7);
        assert_eq!(decode_outpoint(&encode_outpoint(&op)).unwrap(), op);
    }

    #[test]
    fn decode_tx_valid_and_malformed() {
        let raw = consensus::serialize(&minimal_tx());
        assert_eq!(decode_tx(&raw).unwrap(), minimal_tx());

        assert!(matches!(decode_tx(&[]), Err(DecodeError::Transaction(_))));
        assert!(matches!(decode_tx(&raw[..raw.len() - 1]), Err(DecodeError::Transaction(_))));

        let mut trailing = raw.clone();
        trailing.push(0x00);
        assert!(matches!(decode_tx(&trailing), Err(DecodeError::Transaction(_))));
    }

    #[test]
    fn height_out_of_range() {
        assert_eq!(decode_height("height", 700_000), Ok(700_000));
        assert_eq!(
            decode_height("height", u32::MAX),
            Err(DecodeError::OutOfRange { field: "height", value: u32::MAX })
        );
    }

    #[test]
    fn conf_details_decode() {
        let details = ConfDetails {
            raw_tx: consensus::serialize(&minimal_tx()),
            block_hash: vec![0x33; 32],
            block_height: 812_000,
            tx_index: 9,
        };
        let conf = decode_conf_details(&details).unwrap();
        assert_eq!(conf.block_height, 812_000);
        assert_eq!(conf.block_hash, ChainHash::new([0x33; 32]));
        assert_eq!(conf.tx_index, 9);
        assert_eq!(conf.tx, minimal_tx());
    }

    #[test]
    fn conf_details_bad_block_hash() {
        let details = ConfDetails {
            raw_tx: consensus::serialize(&minimal_tx()),
            block_hash: vec![0x33; 20],
            block_height: 1,
            tx_index: 0,
        };
        assert_eq!(
            decode_conf_details(&details),
            Err(DecodeError::InvalidHashLength(20))
        );
    }

    #[test]
    fn spend_details_missing_outpoint() {
        let details = SpendDetails {
            spending_outpoint: None,
            raw_spending_tx: consensus::serialize(&minimal_tx()),
            spending_tx_hash: vec![0x11; 32],
            spending_input_index: 0,
            spending_height: 1,
        };
        assert_eq!(
            decode_spend_details(&details),
            Err(DecodeError::MissingField("spending_outpoint"))
        );
    }

    #[test]
    fn spend_details_decode() {
        let details = SpendDetails {
            spending_outpoint: Some(RpcOutpoint { hash: vec![0; 32], index: 0 }),
            raw_spending_tx: consensus::serialize(&minimal_tx()),
            spending_tx_hash: vec![0x11; 32],
            spending_input_index: 2,
            spending_height: 700_000,
        };
        let spend = decode_spend_details(&details).unwrap();
        assert_eq!(spend.spent_outpoint, Outpoint::new(ChainHash::default(), 0));
        assert_eq!(spend.spender_tx_hash, ChainHash::new([0x11; 32]));
        assert_eq!(spend.spender_input_index, 2);
        assert_eq!(spend.spending_height, 700_000);
    }
}
