// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::{fmt, result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NoError, // will never be produced
    Generic,
    DoesNotExist, // the named entity doesn't exist
    InvalidScore,
    DuplicateId,
    DanglingEdge,
    InvalidPosition,
    JsonSerialization,
    JsonDeserialization,
    SchemaMismatch,
    UnsupportedVersion,
    QuotaExceeded,
    StorageIo,
    BadConfig,
    ExportFailed,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ErrorCode::*;
        let name = match self {
            NoError => "no_error",
            Generic => "generic",
            DoesNotExist => "does_not_exist",
            InvalidScore => "invalid_score",
            DuplicateId => "duplicate_id",
            DanglingEdge => "dangling_edge",
            InvalidPosition => "invalid_position",
            JsonSerialization => "json_serialization",
            JsonDeserialization => "json_deserialization",
            SchemaMismatch => "schema_mismatch",
            UnsupportedVersion => "unsupported_version",
            QuotaExceeded => "quota_exceeded",
            StorageIo => "storage_io",
            BadConfig => "bad_config",
            ExportFailed => "export_failed",
        };

        write!(f, "{name}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Scoring,
    Diagram,
    Editor,
    Storage,
    Config,
    Export,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self {
            ErrorKind::Scoring => "ScoringError",
            ErrorKind::Diagram => "DiagramError",
            ErrorKind::Editor => "EditorError",
            ErrorKind::Storage => "StorageError",
            ErrorKind::Config => "ConfigError",
            ErrorKind::Export => "ExportError",
        };
        write!(f, "{kind}")
    }
}

fn details_suffix(details: &Option<String>) -> String {
    match details {
        Some(details) => format!(": {details}"),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}{{{code}{}}}", details_suffix(.details))]
pub struct Error {
    pub kind: ErrorKind,
    pub code: ErrorCode,
    pub details: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, code: ErrorCode, details: Option<String>) -> Self {
        Error {
            kind,
            code,
            details,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        let code = if err.is_io() {
            ErrorCode::StorageIo
        } else if err.is_data() {
            ErrorCode::SchemaMismatch
        } else {
            ErrorCode::JsonDeserialization
        };
        Error::new(ErrorKind::Storage, code, Some(err.to_string()))
    }
}

pub type Result<T> = result::Result<T, Error>;

#[macro_export]
macro_rules! editor_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Editor, ErrorCode::$code, Some($str)))
    }};
}

#[macro_export]
macro_rules! storage_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Storage, ErrorCode::$code, Some($str)))
    }};
    ($code:tt) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Storage, ErrorCode::$code, None))
    }};
}

#[macro_export]
macro_rules! export_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Export, ErrorCode::$code, Some($str)))
    }};
}
