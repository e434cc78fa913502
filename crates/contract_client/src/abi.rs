//! Minimal Solidity ABI codec covering the shapes the voting contract uses:
//! 256-bit integers, addresses, bools, strings, dynamic arrays and tuples.

use sha3::{Digest, Keccak256};
use shared::domain::Address;

use crate::error::AbiError;

pub const WORD_LEN: usize = 32;

pub type Word = [u8; WORD_LEN];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    Uint,
    Int,
    Address,
    Bool,
    String,
    Array(Box<ParamType>),
    Tuple(Vec<ParamType>),
}

impl ParamType {
    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::String | Self::Array(_) => true,
            Self::Tuple(items) => items.iter().any(Self::is_dynamic),
            _ => false,
        }
    }

    /// Bytes this type occupies in the head of an enclosing tuple.
    fn head_len(&self) -> usize {
        match self {
            Self::Tuple(items) if !self.is_dynamic() => items.iter().map(Self::head_len).sum(),
            _ => WORD_LEN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Uint(Word),
    Int(Word),
    Address(Address),
    Bool(bool),
    String(String),
    Array(Vec<Token>),
    Tuple(Vec<Token>),
}

impl Token {
    pub fn uint(value: u64) -> Self {
        Self::Uint(uint_word(value))
    }

    pub fn int(value: i64) -> Self {
        let fill = if value < 0 { 0xff } else { 0x00 };
        let mut word = [fill; WORD_LEN];
        word[WORD_LEN - 8..].copy_from_slice(&value.to_be_bytes());
        Self::Int(word)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::String(_) | Self::Array(_) => true,
            Self::Tuple(items) => items.iter().any(Self::is_dynamic),
            _ => false,
        }
    }

    pub fn into_u64(self) -> Result<u64, AbiError> {
        match self {
            Self::Uint(word) => word_to_u64(&word),
            _ => Err(AbiError::UnexpectedToken { expected: "uint" }),
        }
    }

    pub fn into_i64(self) -> Result<i64, AbiError> {
        let Self::Int(word) = self else {
            return Err(AbiError::UnexpectedToken { expected: "int" });
        };
        let negative = word[WORD_LEN - 8] & 0x80 != 0;
        let fill = if negative { 0xff } else { 0x00 };
        if word[..WORD_LEN - 8].iter().any(|byte| *byte != fill) {
            return Err(AbiError::IntegerOverflow { bits: 64 });
        }
        let mut tail = [0u8; 8];
        tail.copy_from_slice(&word[WORD_LEN - 8..]);
        Ok(i64::from_be_bytes(tail))
    }

    pub fn into_address(self) -> Result<Address, AbiError> {
        match self {
            Self::Address(address) => Ok(address),
            _ => Err(AbiError::UnexpectedToken { expected: "address" }),
        }
    }

    pub fn into_bool(self) -> Result<bool, AbiError> {
        match self {
            Self::Bool(value) => Ok(value),
            _ => Err(AbiError::UnexpectedToken { expected: "bool" }),
        }
    }

    pub fn into_string(self) -> Result<String, AbiError> {
        match self {
            Self::String(value) => Ok(value),
            _ => Err(AbiError::UnexpectedToken { expected: "string" }),
        }
    }

    pub fn into_array(self) -> Result<Vec<Token>, AbiError> {
        match self {
            Self::Array(items) => Ok(items),
            _ => Err(AbiError::UnexpectedToken { expected: "array" }),
        }
    }

    pub fn into_tuple(self) -> Result<Vec<Token>, AbiError> {
        match self {
            Self::Tuple(items) => Ok(items),
            _ => Err(AbiError::UnexpectedToken { expected: "tuple" }),
        }
    }
}

/// First four bytes of the Keccak-256 hash of a canonical function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = Keccak256::digest(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&digest[..4]);
    out
}

pub fn encode_call(signature: &str, args: &[Token]) -> Vec<u8> {
    let mut out = selector(signature).to_vec();
    out.extend(encode(args));
    out
}

/// Encodes `tokens` as the parameter tuple of a call or return value.
pub fn encode(tokens: &[Token]) -> Vec<u8> {
    encode_tuple(tokens)
}

pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    decode_tuple(types, data, 0)
}

pub fn uint_word(value: u64) -> Word {
    let mut word = [0u8; WORD_LEN];
    word[WORD_LEN - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

fn word_to_u64(word: &Word) -> Result<u64, AbiError> {
    if word[..WORD_LEN - 8].iter().any(|byte| *byte != 0) {
        return Err(AbiError::IntegerOverflow { bits: 64 });
    }
    let mut tail = [0u8; 8];
    tail.copy_from_slice(&word[WORD_LEN - 8..]);
    Ok(u64::from_be_bytes(tail))
}

fn encode_tuple(tokens: &[Token]) -> Vec<u8> {
    let encoded: Vec<Vec<u8>> = tokens.iter().map(encode_token).collect();
    let head_len: usize = tokens
        .iter()
        .zip(&encoded)
        .map(|(token, bytes)| if token.is_dynamic() { WORD_LEN } else { bytes.len() })
        .sum();

    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();
    for (token, bytes) in tokens.iter().zip(encoded) {
        if token.is_dynamic() {
            head.extend_from_slice(&uint_word((head_len + tail.len()) as u64));
            tail.extend(bytes);
        } else {
            head.extend(bytes);
        }
    }
    head.extend(tail);
    head
}

fn encode_token(token: &Token) -> Vec<u8> {
    match token {
        Token::Uint(word) | Token::Int(word) => word.to_vec(),
        Token::Address(address) => {
            let mut word = [0u8; WORD_LEN];
            word[WORD_LEN - Address::LEN..].copy_from_slice(address.as_bytes());
            word.to_vec()
        }
        Token::Bool(value) => uint_word(u64::from(*value)).to_vec(),
        Token::String(value) => {
            let bytes = value.as_bytes();
            let mut out = uint_word(bytes.len() as u64).to_vec();
            out.extend_from_slice(bytes);
            out.resize(WORD_LEN + padded_len(bytes.len()), 0);
            out
        }
        Token::Array(items) => {
            let mut out = uint_word(items.len() as u64).to_vec();
            out.extend(encode_tuple(items));
            out
        }
        Token::Tuple(items) => encode_tuple(items),
    }
}

fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD_LEN) * WORD_LEN
}

fn read_word(data: &[u8], offset: usize) -> Result<Word, AbiError> {
    let end = offset
        .checked_add(WORD_LEN)
        .ok_or(AbiError::OffsetOverflow)?;
    let slice = data.get(offset..end).ok_or(AbiError::Truncated {
        offset,
        needed: WORD_LEN,
        len: data.len(),
    })?;
    let mut word = [0u8; WORD_LEN];
    word.copy_from_slice(slice);
    Ok(word)
}

fn read_usize(data: &[u8], offset: usize) -> Result<usize, AbiError> {
    let value = word_to_u64(&read_word(data, offset)?).map_err(|_| AbiError::OffsetOverflow)?;
    usize::try_from(value).map_err(|_| AbiError::OffsetOverflow)
}

fn decode_tuple(types: &[ParamType], data: &[u8], base: usize) -> Result<Vec<Token>, AbiError> {
    let mut cursor = base;
    let mut out = Vec::with_capacity(types.len());
    for ty in types {
        if ty.is_dynamic() {
            let relative = read_usize(data, cursor)?;
            let start = base.checked_add(relative).ok_or(AbiError::OffsetOverflow)?;
            out.push(decode_token(ty, data, start)?);
        } else {
            out.push(decode_token(ty, data, cursor)?);
        }
        cursor = cursor
            .checked_add(ty.head_len())
            .ok_or(AbiError::OffsetOverflow)?;
    }
    Ok(out)
}

fn decode_token(ty: &ParamType, data: &[u8], offset: usize) -> Result<Token, AbiError> {
    match ty {
        ParamType::Uint => Ok(Token::Uint(read_word(data, offset)?)),
        ParamType::Int => Ok(Token::Int(read_word(data, offset)?)),
        ParamType::Address => {
            let word = read_word(data, offset)?;
            let (padding, bytes) = word.split_at(WORD_LEN - Address::LEN);
            if padding.iter().any(|byte| *byte != 0) {
                return Err(AbiError::DirtyAddress { offset });
            }
            let mut address = [0u8; Address::LEN];
            address.copy_from_slice(bytes);
            Ok(Token::Address(Address(address)))
        }
        ParamType::Bool => match word_to_u64(&read_word(data, offset)?) {
            Ok(0) => Ok(Token::Bool(false)),
            Ok(1) => Ok(Token::Bool(true)),
            _ => Err(AbiError::InvalidBool { offset }),
        },
        ParamType::String => {
            let len = read_usize(data, offset)?;
            let start = offset + WORD_LEN;
            let end = start.checked_add(len).ok_or(AbiError::OffsetOverflow)?;
            let bytes = data.get(start..end).ok_or(AbiError::Truncated {
                offset: start,
                needed: len,
                len: data.len(),
            })?;
            String::from_utf8(bytes.to_vec())
                .map(Token::String)
                .map_err(|_| AbiError::InvalidUtf8 { offset: start })
        }
        ParamType::Array(inner) => {
            let len = read_usize(data, offset)?;
            let start = offset + WORD_LEN;
            // Every element needs at least one head word; refuse lengths the data cannot hold.
            let needed = len.checked_mul(WORD_LEN).ok_or(AbiError::OffsetOverflow)?;
            if start.saturating_add(needed) > data.len() {
                return Err(AbiError::Truncated {
                    offset: start,
                    needed,
                    len: data.len(),
                });
            }
            let types = vec![inner.as_ref().clone(); len];
            decode_tuple(&types, data, start).map(Token::Array)
        }
        ParamType::Tuple(items) => decode_tuple(items, data, offset).map(Token::Tuple),
    }
}
