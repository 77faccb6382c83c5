//! The transaction intent: an unsubmitted, ordered bundle of ledger commands.
//!
//! A [`TransactionIntent`] is pure data. It records the inputs a transaction
//! needs (pure BCS values and object references) and the commands that use
//! them (coin merges, coin splits and Move calls). Commands refer to inputs
//! and to earlier command results through [`Argument`] handles, so a split
//! can feed its output straight into a Move call within the same
//! transaction.
//!
//! The intent serializes to the wallet-standard JSON transaction format
//! (version 2), which is what wallets and sponsor services accept.
//!
//! # Example
//!
//! ```rust
//! use suitudy_sdk::transaction::{MoveCall, TransactionIntent};
//! use suitudy_sdk::types::ObjectId;
//!
//! let mut tx = TransactionIntent::new();
//! let amount = tx.pure(&1_000_000_000u64).unwrap();
//! let gas = tx.gas();
//! let payment = tx.split_coins(gas, [amount]).unwrap()[0];
//! let bank = tx.object(&ObjectId::new("0xb4a7")).unwrap();
//! tx.move_call(MoveCall::new(ObjectId::new("0x16ba"), "suitudy", "buy_token", vec![bank, payment]))
//!     .unwrap();
//!
//! assert_eq!(tx.commands().len(), 2);
//! let json = tx.to_json().unwrap();
//! assert!(json.contains("\"SplitCoins\""));
//! ```

use crate::error::{SuitudyError, SuitudyResult};
use crate::types::{ObjectId, SuiAddress};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// The wire format version produced by [`TransactionIntent::to_json`].
pub const INTENT_JSON_VERSION: u8 = 2;

/// Inputs (and commands) are addressed by `u16`, so an intent holds at most
/// this many of each.
pub const MAX_INTENT_ENTRIES: usize = u16::MAX as usize + 1;

/// A handle to a value usable as a command argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "ArgumentRepr", from = "ArgumentRepr")]
pub enum Argument {
    /// The coin used to pay for gas.
    GasCoin,
    /// The input at the given index.
    Input(u16),
    /// The single result of the command at the given index.
    Result(u16),
    /// One of several results of the command at the given index.
    NestedResult(u16, u16),
}

#[derive(Serialize, Deserialize)]
enum ArgumentRepr {
    GasCoin(bool),
    Input(u16),
    Result(u16),
    NestedResult(u16, u16),
}

impl From<Argument> for ArgumentRepr {
    fn from(arg: Argument) -> Self {
        match arg {
            Argument::GasCoin => ArgumentRepr::GasCoin(true),
            Argument::Input(i) => ArgumentRepr::Input(i),
            Argument::Result(i) => ArgumentRepr::Result(i),
            Argument::NestedResult(i, j) => ArgumentRepr::NestedResult(i, j),
        }
    }
}

impl From<ArgumentRepr> for Argument {
    fn from(repr: ArgumentRepr) -> Self {
        match repr {
            ArgumentRepr::GasCoin(_) => Argument::GasCoin,
            ArgumentRepr::Input(i) => Argument::Input(i),
            ArgumentRepr::Result(i) => Argument::Result(i),
            ArgumentRepr::NestedResult(i, j) => Argument::NestedResult(i, j),
        }
    }
}

/// A transaction input.
#[derive(Clone, PartialEq, Eq)]
pub enum CallArg {
    /// A BCS-encoded pure value.
    Pure(Vec<u8>),
    /// An object referenced by id. Version and digest are resolved by the
    /// wallet or sponsor at signing time.
    Object(ObjectId),
}

impl CallArg {
    /// Returns the object id if this input is an object.
    pub fn as_object(&self) -> Option<&ObjectId> {
        match self {
            CallArg::Object(id) => Some(id),
            CallArg::Pure(_) => None,
        }
    }

    /// Returns the BCS bytes if this input is a pure value.
    pub fn as_pure(&self) -> Option<&[u8]> {
        match self {
            CallArg::Pure(bytes) => Some(bytes),
            CallArg::Object(_) => None,
        }
    }
}

impl fmt::Debug for CallArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallArg::Pure(bytes) => write!(f, "Pure({})", BASE64.encode(bytes)),
            CallArg::Object(id) => write!(f, "Object({id})"),
        }
    }
}

#[derive(Serialize)]
enum CallArgRepr<'a> {
    Pure {
        bytes: String,
    },
    UnresolvedObject {
        #[serde(rename = "objectId")]
        object_id: &'a str,
    },
}

impl Serialize for CallArg {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CallArg::Pure(bytes) => CallArgRepr::Pure {
                bytes: BASE64.encode(bytes),
            },
            CallArg::Object(id) => CallArgRepr::UnresolvedObject {
                object_id: id.as_str(),
            },
        }
        .serialize(serializer)
    }
}

/// A call to a Move function.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCall {
    /// Package that defines the module.
    pub package: ObjectId,
    /// Module name.
    pub module: String,
    /// Function name.
    pub function: String,
    /// Type arguments for generic functions.
    pub type_arguments: Vec<String>,
    /// Arguments, in parameter order.
    pub arguments: Vec<Argument>,
}

impl MoveCall {
    /// Creates a non-generic Move call.
    pub fn new(
        package: ObjectId,
        module: impl Into<String>,
        function: impl Into<String>,
        arguments: Vec<Argument>,
    ) -> Self {
        Self {
            package,
            module: module.into(),
            function: function.into(),
            type_arguments: Vec::new(),
            arguments,
        }
    }

    /// Returns the fully-qualified target, e.g. `0x16ba::suitudy::buy_token`.
    pub fn target(&self) -> String {
        format!("{}::{}::{}", self.package, self.module, self.function)
    }
}

/// A single command within a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Command {
    /// Call a Move function.
    MoveCall(MoveCall),
    /// Merge `sources` into `destination`.
    MergeCoins {
        /// The coin that receives the balance.
        destination: Argument,
        /// Coins that are consumed.
        sources: Vec<Argument>,
    },
    /// Split one new coin per amount off `coin`.
    SplitCoins {
        /// The coin being split.
        coin: Argument,
        /// Amounts (pure u64 inputs) of the new coins.
        amounts: Vec<Argument>,
    },
}

/// An unsubmitted transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionIntent {
    sender: Option<SuiAddress>,
    inputs: Vec<CallArg>,
    commands: Vec<Command>,
}

impl TransactionIntent {
    /// Creates an empty intent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle to the gas coin.
    pub fn gas(&self) -> Argument {
        Argument::GasCoin
    }

    /// Adds an object input and returns its handle.
    ///
    /// Referencing the same object twice reuses the existing input.
    ///
    /// # Errors
    ///
    /// Returns [`SuitudyError::InvalidInput`] if the intent already holds
    /// [`MAX_INTENT_ENTRIES`] inputs.
    pub fn object(&mut self, id: &ObjectId) -> SuitudyResult<Argument> {
        let existing = self
            .inputs
            .iter()
            .position(|input| input.as_object() == Some(id));
        match existing {
            Some(index) => Ok(Argument::Input(entry_index(index, "input")?)),
            None => self.push_input(CallArg::Object(id.clone())),
        }
    }

    /// Adds a BCS-encoded pure input and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns [`SuitudyError::Bcs`] if the value cannot be encoded, or
    /// [`SuitudyError::InvalidInput`] if the intent is out of input slots.
    pub fn pure<T: Serialize + ?Sized>(&mut self, value: &T) -> SuitudyResult<Argument> {
        let bytes = bcs::to_bytes(value).map_err(SuitudyError::bcs)?;
        self.push_input(CallArg::Pure(bytes))
    }

    /// Appends a merge of `sources` into `destination`.
    pub fn merge_coins(&mut self, destination: Argument, sources: Vec<Argument>) {
        self.commands.push(Command::MergeCoins {
            destination,
            sources,
        });
    }

    /// Appends a split of `coin` and returns one handle per new coin.
    ///
    /// # Errors
    ///
    /// Returns [`SuitudyError::InvalidInput`] if the command or one of its
    /// results cannot be addressed. Nothing is appended in that case.
    pub fn split_coins(
        &mut self,
        coin: Argument,
        amounts: impl IntoIterator<Item = Argument>,
    ) -> SuitudyResult<Vec<Argument>> {
        let amounts: Vec<Argument> = amounts.into_iter().collect();
        let index = entry_index(self.commands.len(), "command")?;
        let results = (0..amounts.len())
            .map(|i| Ok(Argument::NestedResult(index, entry_index(i, "split result")?)))
            .collect::<SuitudyResult<Vec<_>>>()?;
        self.commands.push(Command::SplitCoins { coin, amounts });
        Ok(results)
    }

    /// Appends a Move call and returns a handle to its result.
    ///
    /// # Errors
    ///
    /// Returns [`SuitudyError::InvalidInput`] if the intent already holds
    /// [`MAX_INTENT_ENTRIES`] commands.
    pub fn move_call(&mut self, call: MoveCall) -> SuitudyResult<Argument> {
        let index = entry_index(self.commands.len(), "command")?;
        self.commands.push(Command::MoveCall(call));
        Ok(Argument::Result(index))
    }

    /// Sets the sender. Wallets fill this in when it is left empty.
    pub fn set_sender(&mut self, sender: SuiAddress) {
        self.sender = Some(sender);
    }

    /// Returns the sender, if one was set.
    pub fn sender(&self) -> Option<&SuiAddress> {
        self.sender.as_ref()
    }

    /// Returns how many more inputs the intent can address.
    pub fn remaining_inputs(&self) -> usize {
        MAX_INTENT_ENTRIES.saturating_sub(self.inputs.len())
    }

    /// Returns the inputs in order.
    pub fn inputs(&self) -> &[CallArg] {
        &self.inputs
    }

    /// Returns the commands in order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Resolves an [`Argument::Input`] handle to the input it refers to.
    pub fn input(&self, arg: Argument) -> Option<&CallArg> {
        match arg {
            Argument::Input(index) => self.inputs.get(index as usize),
            _ => None,
        }
    }

    /// Returns the Move calls in the intent.
    pub fn move_calls(&self) -> impl Iterator<Item = &MoveCall> {
        self.commands.iter().filter_map(|command| match command {
            Command::MoveCall(call) => Some(call),
            _ => None,
        })
    }

    /// Serializes the intent to the wallet-standard JSON transaction format.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn to_json(&self) -> SuitudyResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the intent to a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn to_json_value(&self) -> SuitudyResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    fn push_input(&mut self, input: CallArg) -> SuitudyResult<Argument> {
        let index = entry_index(self.inputs.len(), "input")?;
        self.inputs.push(input);
        Ok(Argument::Input(index))
    }
}

fn entry_index(index: usize, kind: &str) -> SuitudyResult<u16> {
    u16::try_from(index).map_err(|_| {
        SuitudyError::invalid_input(format!(
            "transaction exceeds {MAX_INTENT_ENTRIES} {kind}s"
        ))
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GasData {
    budget: Option<String>,
    price: Option<String>,
    owner: Option<String>,
    payment: Option<Vec<serde_json::Value>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TransactionDataRepr<'a> {
    version: u8,
    sender: Option<&'a SuiAddress>,
    expiration: Option<()>,
    gas_data: GasData,
    inputs: &'a [CallArg],
    commands: &'a [Command],
}

impl Serialize for TransactionIntent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TransactionDataRepr {
            version: INTENT_JSON_VERSION,
            sender: self.sender.as_ref(),
            expiration: None,
            gas_data: GasData {
                budget: None,
                price: None,
                owner: None,
                payment: None,
            },
            inputs: &self.inputs,
            commands: &self.commands,
        }
        .serialize(serializer)
    }
}
