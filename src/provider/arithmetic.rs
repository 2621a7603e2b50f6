//! The arithmetic capability and its local implementation.

use crate::core::Operator;
use crate::provider::error::ApiError;
use async_trait::async_trait;

/// A resolved computation: the value plus the operation the provider reports.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Computation {
    pub result: f64,
    pub operator: Operator,
}

/// Something that can perform the six calculator operations.
///
/// Implementations may compute locally or call out to a remote service.
/// Input validation (division by zero, negative radicands) happens before
/// a provider is called, so providers need not repeat it.
#[async_trait]
pub trait ArithmeticProvider: Send + Sync {
    async fn add(&self, lhs: f64, rhs: f64) -> Result<Computation, ApiError>;

    async fn subtract(&self, lhs: f64, rhs: f64) -> Result<Computation, ApiError>;

    async fn multiply(&self, lhs: f64, rhs: f64) -> Result<Computation, ApiError>;

    async fn divide(&self, lhs: f64, rhs: f64) -> Result<Computation, ApiError>;

    async fn power(&self, base: f64, exponent: f64) -> Result<Computation, ApiError>;

    async fn square_root(&self, value: f64) -> Result<Computation, ApiError>;
}

/// Route `operator` to the matching provider operation.
///
/// `rhs` is ignored for square root.
pub async fn dispatch(
    provider: &dyn ArithmeticProvider,
    operator: Operator,
    lhs: f64,
    rhs: f64,
) -> Result<Computation, ApiError> {
    match operator {
        Operator::Add => provider.add(lhs, rhs).await,
        Operator::Subtract => provider.subtract(lhs, rhs).await,
        Operator::Multiply => provider.multiply(lhs, rhs).await,
        Operator::Divide => provider.divide(lhs, rhs).await,
        Operator::Power => provider.power(lhs, rhs).await,
        Operator::Sqrt => provider.square_root(lhs).await,
    }
}

/// Native floating-point arithmetic, no network involved.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalArithmetic;

impl LocalArithmetic {
    fn computed(result: f64, operator: Operator) -> Result<Computation, ApiError> {
        Ok(Computation { result, operator })
    }
}

#[async_trait]
impl ArithmeticProvider for LocalArithmetic {
    async fn add(&self, lhs: f64, rhs: f64) -> Result<Computation, ApiError> {
        Self::computed(lhs + rhs, Operator::Add)
    }

    async fn subtract(&self, lhs: f64, rhs: f64) -> Result<Computation, ApiError> {
        Self::computed(lhs - rhs, Operator::Subtract)
    }

    async fn multiply(&self, lhs: f64, rhs: f64) -> Result<Computation, ApiError> {
        Self::computed(lhs * rhs, Operator::Multiply)
    }

    async fn divide(&self, lhs: f64, rhs: f64) -> Result<Computation, ApiError> {
        Self::computed(lhs / rhs, Operator::Divide)
    }

    async fn power(&self, base: f64, exponent: f64) -> Result<Computation, ApiError> {
        Self::computed(base.powf(exponent), Operator::Power)
    }

    async fn square_root(&self, value: f64) -> Result<Computation, ApiError> {
        Self::computed(value.sqrt(), Operator::Sqrt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_provider_computes_each_operator() {
        let provider = LocalArithmetic;
        let cases = [
            (Operator::Add, 5.0, 3.0, 8.0),
            (Operator::Subtract, 5.0, 3.0, 2.0),
            (Operator::Multiply, 5.0, 3.0, 15.0),
            (Operator::Divide, 9.0, 3.0, 3.0),
            (Operator::Power, 2.0, 10.0, 1024.0),
            (Operator::Sqrt, 81.0, 0.0, 9.0),
        ];

        for (operator, lhs, rhs, expected) in cases {
            let computation = dispatch(&provider, operator, lhs, rhs).await.unwrap();
            assert_eq!(computation.result, expected, "{operator:?}");
            assert_eq!(computation.operator, operator);
        }
    }
}
