//! Binary encoding of transactions, the input to signing.
//!
//! Integers are little-endian, lengths and counts are unsigned LEB128
//! varints and strings are length-prefixed UTF-8.

use crate::ledger::transaction::{Operation, Transaction};
use crate::post::Post;

/// Types with a ledger wire representation.
pub trait LedgerEncode {
    fn encode(&self, out: &mut Vec<u8>);

    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode(&mut out);
        out
    }
}

pub fn write_varint(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

pub fn write_str(out: &mut Vec<u8>, value: &str) {
    write_varint(out, value.len() as u64);
    out.extend_from_slice(value.as_bytes());
}

impl LedgerEncode for Post {
    fn encode(&self, out: &mut Vec<u8>) {
        write_str(out, &self.parent_author);
        write_str(out, &self.parent_permlink);
        write_str(out, &self.author);
        write_str(out, &self.permlink);
        write_str(out, &self.title);
        write_str(out, &self.body);
        write_str(out, &self.json_metadata);
    }
}

impl LedgerEncode for Operation {
    fn encode(&self, out: &mut Vec<u8>) {
        write_varint(out, self.id());
        match self {
            Operation::Comment(post) => post.encode(out),
        }
    }
}

impl LedgerEncode for Transaction {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.ref_block_num.to_le_bytes());
        out.extend_from_slice(&self.ref_block_prefix.to_le_bytes());
        out.extend_from_slice(&self.expiration_secs().to_le_bytes());

        write_varint(out, self.operations.len() as u64);
        for op in &self.operations {
            op.encode(out);
        }

        // extensions are always empty
        write_varint(out, 0);
    }
}
