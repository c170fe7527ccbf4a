//! Chaincode entry point - resolves a function name once and routes its
//! positional arguments to the engine.
//!
//! ## Example
//!
//! ```ignore
//! use datastatis_ledger::{Chaincode, MemoryLedger, Response};
//!
//! let chaincode = Chaincode::new(MemoryLedger::new());
//! let response = chaincode.invoke("getHistoryByKey", &["1_20231114_M_9".to_string()]);
//! assert_eq!(response.status, Response::OK);
//! ```

use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::config::Config;
use crate::engine::Engine;
use crate::error::ChaincodeError;
use crate::store::LedgerStore;

/// The closed set of invocable functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Save,
    Update,
    Delete,
    Query,
    GetHistoryByKey,
}

impl Function {
    pub fn name(&self) -> &'static str {
        match self {
            Function::Save => "save",
            Function::Update => "update",
            Function::Delete => "delete",
            Function::Query => "query",
            Function::GetHistoryByKey => "getHistoryByKey",
        }
    }
}

impl FromStr for Function {
    type Err = ChaincodeError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "save" => Ok(Function::Save),
            "update" => Ok(Function::Update),
            "delete" => Ok(Function::Delete),
            "query" => Ok(Function::Query),
            "getHistoryByKey" => Ok(Function::GetHistoryByKey),
            other => Err(ChaincodeError::UnknownFunction(other.to_string())),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of an invocation, shaped like a peer response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: i32,
    pub message: String,
    pub payload: Vec<u8>,
}

impl Response {
    pub const OK: i32 = 200;
    pub const ERROR: i32 = 500;

    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            status: Self::OK,
            message: String::new(),
            payload,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Self::ERROR,
            message: message.into(),
            payload: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Self::OK
    }
}

impl From<Result<Vec<u8>, ChaincodeError>> for Response {
    fn from(result: Result<Vec<u8>, ChaincodeError>) -> Self {
        match result {
            Ok(payload) => Response::success(payload),
            Err(e) => Response::error(e.to_string()),
        }
    }
}

pub struct Chaincode<S> {
    engine: Engine<S>,
}

impl<S: LedgerStore> Chaincode<S> {
    pub fn new(store: S) -> Self {
        Self {
            engine: Engine::new(store),
        }
    }

    pub fn with_config(store: S, config: Config) -> Result<Self, ChaincodeError> {
        Ok(Self {
            engine: Engine::with_config(store, config)?,
        })
    }

    pub fn engine(&self) -> &Engine<S> {
        &self.engine
    }

    /// Instantiation hook. Nothing to initialize.
    pub fn init(&self, _args: &[String]) -> Response {
        Response::success(Vec::new())
    }

    /// Route `function` and its arguments, folding any error into the response.
    pub fn invoke(&self, function: &str, args: &[String]) -> Response {
        debug!(function, "invoke is running");
        let function = match function.parse::<Function>() {
            Ok(function) => function,
            Err(e) => {
                warn!(function, "invoke did not find func");
                return Response::error(e.to_string());
            }
        };
        self.call(function, args).into()
    }

    /// Run an already-resolved function.
    pub fn call(&self, function: Function, args: &[String]) -> Result<Vec<u8>, ChaincodeError> {
        match function {
            Function::Save => self.save(args),
            Function::Update => self.update(args),
            Function::Delete => self.delete(args),
            Function::Query => self.query(args),
            Function::GetHistoryByKey => self.get_history_by_key(args),
        }
    }

    pub fn save(&self, args: &[String]) -> Result<Vec<u8>, ChaincodeError> {
        let record = self.engine.parse_record(args)?;
        self.engine.create(&record)?;
        Ok(Vec::new())
    }

    pub fn update(&self, args: &[String]) -> Result<Vec<u8>, ChaincodeError> {
        let record = self.engine.parse_record(args)?;
        self.engine.update(&record)?;
        Ok(Vec::new())
    }

    pub fn delete(&self, args: &[String]) -> Result<Vec<u8>, ChaincodeError> {
        self.engine.delete(first_arg(args)?)?;
        Ok(Vec::new())
    }

    pub fn query(&self, args: &[String]) -> Result<Vec<u8>, ChaincodeError> {
        self.engine.query(first_arg(args)?)
    }

    pub fn get_history_by_key(&self, args: &[String]) -> Result<Vec<u8>, ChaincodeError> {
        self.engine.history(first_arg(args)?)
    }
}

/// Single-argument functions read the first argument and ignore the rest.
fn first_arg(args: &[String]) -> Result<&str, ChaincodeError> {
    args.first()
        .map(String::as_str)
        .ok_or(ChaincodeError::Arity {
            expected: 1,
            actual: 0,
        })
}
