//! # Certificate — Bilingual Discovery Certificates
//!
//! Human-readable records for probable primes found in the extended
//! (20^100 + offset) family. Each certificate carries a UUID, a UTC
//! timestamp, the candidate's shape (base display, exponent, digit count,
//! approximate bit strength) and a value sample, and renders in English or
//! Simplified Chinese. These are display artifacts for the presentation
//! layer — the primality claim itself is probabilistic (Miller–Rabin), and
//! the verify subcommand is the way to re-check it.
//!
//! All fields are plain strings/integers and serialize to JSON via serde.

use chrono::Utc;
use rug::Integer;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bits per decimal digit, log2(10).
const BITS_PER_DIGIT: f64 = 3.321928;

/// Certificate language.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lang {
    En,
    ZhCn,
}

impl Lang {
    /// File-name suffix used by the report writer.
    pub fn file_suffix(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::ZhCn => "zh-cn",
        }
    }
}

/// Strength tier derived from approximate bit length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityTier {
    Strategic,
    TopSecret,
    Omega,
}

impl SecurityTier {
    pub fn for_bits(bits: u64) -> Self {
        if bits < 4096 {
            SecurityTier::Strategic
        } else if bits < 10_000 {
            SecurityTier::TopSecret
        } else {
            SecurityTier::Omega
        }
    }

    fn label(self, lang: Lang) -> &'static str {
        match (self, lang) {
            (SecurityTier::Strategic, Lang::En) => "CLASS S: STRATEGIC / MILITARY GRADE",
            (SecurityTier::TopSecret, Lang::En) => "CLASS X: TOP SECRET / NEXT-GEN CRYPTO",
            (SecurityTier::Omega, Lang::En) => "CLASS OMEGA: MAXIMUM THEORETICAL SECURITY",
            (SecurityTier::Strategic, Lang::ZhCn) => "S级：战略/军用级",
            (SecurityTier::TopSecret, Lang::ZhCn) => "X级：绝密/下一代加密",
            (SecurityTier::Omega, Lang::ZhCn) => "欧米伽级：最高理论安全",
        }
    }
}

/// One discovery certificate.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Certificate {
    pub id: String,
    pub issued_at: String,
    pub base: String,
    /// Offset above the family base (20^100), when the base belongs to it.
    pub offset: Option<u64>,
    pub exponent: u32,
    pub digits: u64,
    pub bit_strength: u64,
    pub tier: SecurityTier,
    value: String,
}

impl Certificate {
    pub fn new(q: &Integer, offset: Option<u64>, n: u32, value: &Integer) -> Self {
        let value = value.to_string_radix(10);
        let digits = value.len() as u64;
        let bit_strength = (digits as f64 * BITS_PER_DIGIT) as u64;
        Certificate {
            id: Uuid::new_v4().to_string().to_uppercase(),
            issued_at: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            base: q.to_string_radix(10),
            offset,
            exponent: n,
            digits,
            bit_strength,
            tier: SecurityTier::for_bits(bit_strength),
            value,
        }
    }

    /// Full decimal value, for the FULL VALUE section of certificate files.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Abbreviated value: head ... tail once it no longer fits on a line.
    fn value_sample(&self) -> String {
        if self.digits > 60 {
            format!(
                "{} ... {}",
                &self.value[..30],
                &self.value[self.value.len() - 30..]
            )
        } else {
            self.value.clone()
        }
    }

    /// Base display: the family form plus a suffix when the offset is known,
    /// the raw decimal base otherwise.
    fn base_display(&self) -> String {
        match self.offset {
            Some(offset) => {
                let tail_start = self.base.len().saturating_sub(10);
                format!("20^100 + {} (Suffix...{})", offset, &self.base[tail_start..])
            }
            None => self.base.clone(),
        }
    }

    pub fn render(&self, lang: Lang) -> String {
        match lang {
            Lang::En => format!(
                "\n\
                 ============= PRP DISCOVERY CERTIFICATE =============\n\
                 CERT ID    : {}\n\
                 DATE       : {}\n\
                 LEVEL      : {}\n\
                 -----------------------------------------------------\n\
                 Base (q)   : {}\n\
                 Exponent(n): {}\n\
                 Digits     : {}\n\
                 Bit Str    : ~{} bits\n\
                 -----------------------------------------------------\n\
                 Value Sampl: {}\n\
                 =====================================================\n",
                self.id,
                self.issued_at,
                self.tier.label(lang),
                self.base_display(),
                self.exponent,
                self.digits,
                self.bit_strength,
                self.value_sample(),
            ),
            Lang::ZhCn => format!(
                "\n\
                 ============= 可能素数发现证书 =============\n\
                 证书 ID    : {}\n\
                 发现时间   : {}\n\
                 安全等级   : {}\n\
                 ---------------------------------------------\n\
                 底数 (q)   : {}\n\
                 指数 (n)   : {}\n\
                 十进制位数 : {}\n\
                 比特强度   : ~{} bits\n\
                 ---------------------------------------------\n\
                 素数值摘要 : {}\n\
                 =============================================\n",
                self.id,
                self.issued_at,
                self.tier.label(lang),
                self.base_display(),
                self.exponent,
                self.digits,
                self.bit_strength,
                self.value_sample(),
            ),
        }
    }
}
