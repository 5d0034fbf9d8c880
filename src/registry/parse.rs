use serde_json::Value;

use crate::error::{Result, SolverError};
use crate::registry::types::{Intent, IntentEvent, IntentStatus, ProtocolConfig};
use crate::rpc::types::{EventEnvelope, ObjectSnapshot};

/// Extracts the two `TypeName`s from a parameterised object type string,
/// e.g. `0xabc::intent::Intent<0x2::sui::SUI, 0x...::test_usdc::TEST_USDC>`
/// → `("0x2::sui::SUI", "0x...::test_usdc::TEST_USDC")`.
pub fn split_type_params(type_str: &str) -> Result<(String, String)> {
    let open = type_str
        .find('<')
        .ok_or_else(|| SolverError::Parse(format!("no type parameters in {type_str}")))?;
    let close = type_str
        .rfind('>')
        .ok_or_else(|| SolverError::Parse(format!("unterminated type parameters in {type_str}")))?;
    if close <= open {
        return Err(SolverError::Parse(format!("malformed type parameters in {type_str}")));
    }

    let inner = &type_str[open + 1..close];
    let mut depth = 0i32;
    let mut split_at = None;
    for (i, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth -= 1,
            ',' if depth == 0 => {
                split_at = Some(i);
                break;
            }
            _ => {}
        }
    }
    let split_at = split_at
        .ok_or_else(|| SolverError::Parse(format!("expected two type parameters in {type_str}")))?;

    let first = inner[..split_at].trim().to_string();
    let second = inner[split_at + 1..].trim().to_string();
    Ok((first, second))
}

/// Either a bare numeric string or `{fields:{value:"..."}}`, depending on
/// RPC version.
fn parse_balance_field(value: &Value) -> Option<u64> {
    if let Some(s) = value.as_str() {
        return s.parse().ok();
    }
    value
        .get("fields")
        .and_then(|f| f.get("value"))
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
}

fn parse_u64_field(fields: &Value, key: &str) -> Result<u64> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| SolverError::Parse(format!("missing or malformed field {key}")))
}

fn parse_str_field(fields: &Value, key: &str) -> Result<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| SolverError::Parse(format!("missing or malformed field {key}")))
}

/// Parse an `Intent` object snapshot into a typed record. Returns
/// `SolverError::NotFound` if the snapshot carries no content (deleted or
/// never-existed object).
pub fn parse_intent(snapshot: &ObjectSnapshot) -> Result<Intent> {
    if snapshot.fields.is_null() {
        return Err(SolverError::NotFound(format!(
            "intent object {} has no content",
            snapshot.object_id
        )));
    }

    let (input_type, output_type) = split_type_params(&snapshot.type_)?;

    let owner = parse_str_field(&snapshot.fields, "owner")?;
    let min_output_amount = parse_u64_field(&snapshot.fields, "min_output_amount")?;
    let deadline = parse_u64_field(&snapshot.fields, "deadline")?;

    let status_raw = snapshot
        .fields
        .get("status")
        .and_then(Value::as_u64)
        .ok_or_else(|| SolverError::Parse("missing status field".to_string()))?;
    let status = IntentStatus::from_u8(status_raw as u8)
        .ok_or_else(|| SolverError::Parse(format!("unknown intent status {status_raw}")))?;

    let input_balance = snapshot
        .fields
        .get("input_balance")
        .and_then(parse_balance_field)
        .ok_or_else(|| SolverError::Parse("missing or malformed input_balance".to_string()))?;

    let solver = snapshot
        .fields
        .get("solver")
        .and_then(|v| v.get("vec"))
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(Intent {
        intent_id: snapshot.object_id.clone(),
        owner,
        input_type,
        output_type,
        input_balance,
        min_output_amount,
        deadline,
        status,
        solver,
    })
}

/// Parse a `ProtocolConfig` shared-object snapshot.
pub fn parse_config(snapshot: &ObjectSnapshot) -> Result<ProtocolConfig> {
    if snapshot.fields.is_null() {
        return Err(SolverError::NotFound(format!(
            "config object {} has no content",
            snapshot.object_id
        )));
    }

    let fee_bps = parse_u64_field(&snapshot.fields, "fee_bps")?;
    let fee_recipient = parse_str_field(&snapshot.fields, "fee_recipient")?;
    let paused = snapshot
        .fields
        .get("paused")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    Ok(ProtocolConfig {
        fee_bps,
        fee_recipient,
        paused,
    })
}

/// Parse a single event envelope into a typed `IntentEvent`, dispatching on
/// the event's declared Move type.
pub fn parse_event(envelope: &EventEnvelope) -> Result<IntentEvent> {
    let parsed = &envelope.parsed_json;

    if envelope.type_.contains("IntentCreated") {
        Ok(IntentEvent::Created {
            intent_id: parse_str_field(parsed, "intent_id")?,
            owner: parse_str_field(parsed, "owner")?,
            input_type: parse_str_field(parsed, "input_type")?,
            output_type: parse_str_field(parsed, "output_type")?,
            input_amount: parse_u64_field(parsed, "input_amount")?,
            min_output_amount: parse_u64_field(parsed, "min_output_amount")?,
            deadline: parse_u64_field(parsed, "deadline")?,
        })
    } else if envelope.type_.contains("IntentExecuted") {
        Ok(IntentEvent::Executed {
            intent_id: parse_str_field(parsed, "intent_id")?,
            solver: parse_str_field(parsed, "solver")?,
            input_amount: parse_u64_field(parsed, "input_amount")?,
            output_amount: parse_u64_field(parsed, "output_amount")?,
            fee_amount: parse_u64_field(parsed, "fee_amount")?,
            execution_time: parse_u64_field(parsed, "execution_time")?,
        })
    } else if envelope.type_.contains("IntentCancelled") {
        Ok(IntentEvent::Cancelled {
            intent_id: parse_str_field(parsed, "intent_id")?,
            owner: parse_str_field(parsed, "owner")?,
        })
    } else if envelope.type_.contains("IntentExpired") {
        Ok(IntentEvent::Expired {
            intent_id: parse_str_field(parsed, "intent_id")?,
            owner: parse_str_field(parsed, "owner")?,
            triggered_by: parse_str_field(parsed, "triggered_by")?,
            refund_amount: parse_u64_field(parsed, "refund_amount")?,
        })
    } else {
        Err(SolverError::Parse(format!("unrecognised event type {}", envelope.type_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn splits_nested_type_params() {
        let t = "0xabc::intent::Intent<0x2::sui::SUI, 0x...::test_usdc::TEST_USDC>";
        let (a, b) = split_type_params(t).unwrap();
        assert_eq!(a, "0x2::sui::SUI");
        assert_eq!(b, "0x...::test_usdc::TEST_USDC");
    }

    #[test]
    fn splits_type_params_with_generic_nesting() {
        let t = "0xabc::intent::Intent<0x2::coin::Coin<0x2::sui::SUI>, 0x2::sui::SUI>";
        let (a, b) = split_type_params(t).unwrap();
        assert_eq!(a, "0x2::coin::Coin<0x2::sui::SUI>");
        assert_eq!(b, "0x2::sui::SUI");
    }

    #[test]
    fn parses_both_input_balance_shapes() {
        let bare = json!("123");
        assert_eq!(parse_balance_field(&bare), Some(123));

        let wrapped = json!({ "fields": { "value": "456" } });
        assert_eq!(parse_balance_field(&wrapped), Some(456));
    }

    #[test]
    fn parse_intent_rejects_missing_content() {
        let snapshot = ObjectSnapshot {
            object_id: "0x1".to_string(),
            type_: "0xabc::intent::Intent<0x2::sui::SUI,0x2::usdc::USDC>".to_string(),
            fields: Value::Null,
        };
        assert!(matches!(parse_intent(&snapshot), Err(SolverError::NotFound(_))));
    }

    #[test]
    fn parse_intent_happy_path() {
        let snapshot = ObjectSnapshot {
            object_id: "0x1".to_string(),
            type_: "0xabc::intent::Intent<0x2::sui::SUI, 0x2::usdc::USDC>".to_string(),
            fields: json!({
                "owner": "0xowner",
                "min_output_amount": "1800000",
                "deadline": "3600000",
                "status": 0,
                "input_balance": "1000000000",
                "solver": { "vec": [] },
            }),
        };
        let intent = parse_intent(&snapshot).unwrap();
        assert_eq!(intent.input_type, "0x2::sui::SUI");
        assert_eq!(intent.output_type, "0x2::usdc::USDC");
        assert_eq!(intent.input_balance, 1_000_000_000);
        assert_eq!(intent.status, IntentStatus::Open);
        assert!(intent.solver.is_none());
    }
}
