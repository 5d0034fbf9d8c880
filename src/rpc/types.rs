use serde_json::Value;

/// Raw object fields plus the object's declared Move type string.
#[derive(Debug, Clone)]
pub struct ObjectSnapshot {
    pub object_id: String,
    pub type_: String,
    pub fields: Value,
}

/// One coin owned by an address: its object id and raw balance.
#[derive(Debug, Clone)]
pub struct CoinRef {
    pub coin_id: String,
    pub balance: u64,
}

/// A single event delivery: its Move event type, parsed JSON payload, and
/// chain timestamp in epoch milliseconds.
#[derive(Debug, Clone)]
pub struct EventEnvelope {
    pub type_: String,
    pub parsed_json: Value,
    pub timestamp_ms: u64,
}

/// One BCS-encoded return value from a `dev_inspect` call, alongside its
/// Move type tag.
#[derive(Debug, Clone)]
pub struct ReturnValue {
    pub bcs_bytes: Vec<u8>,
    pub type_tag: String,
}

/// Aggregate result of a `dev_inspect` simulation.
#[derive(Debug, Clone, Default)]
pub struct DevInspectResult {
    pub results: Vec<ReturnValue>,
}

/// Outcome of a signed transaction submission.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub digest: String,
    pub effects_status: EffectsStatus,
    pub gas_used: u64,
    pub events: Vec<EventEnvelope>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectsStatus {
    Success,
    Failure { abort_code: Option<u64>, reason: String },
}

/// A pure description of a Move call to be turned into transaction bytes.
/// Transaction-plan builders (`registry::tx_builder`) produce these; the
/// RPC client turns them into bytes via `build_unsigned`, never executing
/// anything itself.
#[derive(Debug, Clone)]
pub struct TxPlan {
    pub function: MoveTarget,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<TxArg>,
    pub gas_budget: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct MoveTarget {
    pub package: String,
    pub module: String,
    pub function: String,
}

impl MoveTarget {
    pub fn new(package: impl Into<String>, module: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            module: module.into(),
            function: function.into(),
        }
    }
}

/// An argument to a Move call: an object reference, a pure BCS-encodable
/// value, or the result of a prior command within the same PTB.
#[derive(Debug, Clone)]
pub enum TxArg {
    Object(String),
    Pure(Value),
    Result(usize),
    GasCoin,
}

/// One command in a programmable transaction block: either a Move call or
/// one of the two native coin-shaping commands. `MergeCoins`/`SplitCoins`
/// exist so a PTB can turn several selected coins into exactly the amount
/// a later command needs, without a separate round trip.
#[derive(Debug, Clone)]
pub enum TxCommand {
    MoveCall(TxPlan),
    MergeCoins { destination: TxArg, sources: Vec<TxArg> },
    SplitCoins { coin: TxArg, amounts: Vec<TxArg> },
}
