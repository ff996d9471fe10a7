use httprpc_service::{
    Invocation, MethodSignature, RemoteError, RemoteInterface, RemoteObject, positional_param,
};
use serde_json::Value;

pub const SIMPLE_CALC_INTERFACE: RemoteInterface = RemoteInterface::new(
    "SimpleCalc",
    &[
        MethodSignature::deferred("add"),
        MethodSignature::deferred("sub"),
        MethodSignature::deferred("mul"),
        MethodSignature::deferred("div"),
    ],
);

/// Integer arithmetic. `div` yields a float and rejects a zero divisor.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleCalc;

impl SimpleCalc {
    fn operands(params: &[Value]) -> Result<(i64, i64), RemoteError> {
        Ok((positional_param(params, 0)?, positional_param(params, 1)?))
    }
}

impl RemoteObject for SimpleCalc {
    fn class_name(&self) -> &'static str {
        "SimpleCalc"
    }

    fn implements(&self, interface: &RemoteInterface) -> bool {
        interface.matches(SIMPLE_CALC_INTERFACE.name())
    }

    fn dispatch(&self, method: &str, params: Vec<Value>) -> Option<Invocation> {
        let invocation = match method {
            "add" => Invocation::deferred_value(async move {
                let (a, b) = Self::operands(&params)?;
                Ok(a.wrapping_add(b))
            }),
            "sub" => Invocation::deferred_value(async move {
                let (a, b) = Self::operands(&params)?;
                Ok(a.wrapping_sub(b))
            }),
            "mul" => Invocation::deferred_value(async move {
                let (a, b) = Self::operands(&params)?;
                Ok(a.wrapping_mul(b))
            }),
            "div" => Invocation::deferred_value(async move {
                let (a, b) = Self::operands(&params)?;
                if b == 0 {
                    return Err(RemoteError::new("DivisionByZeroError", "Division by zero"));
                }
                Ok(a as f64 / b as f64)
            }),
            _ => return None,
        };

        Some(invocation)
    }
}
