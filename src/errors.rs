use std::io;

use thiserror::Error;

use crate::types::DomainName;

/// Error type for sampling, corpus loading, and history persistence failures.
#[derive(Debug, Error)]
pub enum MarqueeError {
    /// A draw was attempted against a pool with no corpora.
    #[error("corpus pool '{pool}' is empty")]
    EmptyPool {
        /// Pool label.
        pool: String,
    },
    /// A draw was attempted against a corpus with no items.
    #[error("corpus '{corpus}' is empty")]
    EmptyCorpus {
        /// Corpus name.
        corpus: String,
    },
    /// History has no entry for the requested domain.
    #[error("unknown domain '{domain}'")]
    UnknownDomain {
        /// Requested domain.
        domain: DomainName,
    },
    /// A corpus file lacks the requested key.
    #[error("domain '{domain}' not found in '{origin}'")]
    UnknownCorpusDomain {
        /// File or label the payload came from.
        origin: String,
        /// Requested key.
        domain: DomainName,
    },
    /// Malformed corpus, history, or manifest JSON.
    #[error("could not decode '{origin}': {reason}")]
    Decode {
        /// File or label the payload came from.
        origin: String,
        /// Decoder message.
        reason: String,
    },
    /// State could not be serialized for persistence.
    #[error("could not encode '{target}': {reason}")]
    Encode {
        /// What was being encoded.
        target: String,
        /// Encoder message.
        reason: String,
    },
    /// The configured retry cap ran out before a candidate passed the filters.
    #[error("no candidate from pool '{pool}' passed its filters after {attempts} attempts")]
    FilterUnsatisfiable {
        /// Pool label.
        pool: String,
        /// Draws made before giving up.
        attempts: usize,
    },
    /// An unwanted-word regex failed to compile.
    #[error("invalid filter pattern '{pattern}': {reason}")]
    InvalidFilterPattern {
        /// Regex source.
        pattern: String,
        /// Compiler message.
        reason: String,
    },
    /// Missing environment, directories, or manifest misuse.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Underlying filesystem failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl MarqueeError {
    pub(crate) fn decode(origin: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            origin: origin.into(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn encode(target: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Encode {
            target: target.into(),
            reason: err.to_string(),
        }
    }
}
