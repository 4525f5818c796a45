// src/circuits/mod.rs

//! Defines structures for representing and building ordered sequences of
//! operator applications, and the table that resolves operator names to matrices.
//!
//! A [`Circuit`] only stores operator *names*. They are resolved against an
//! [`OperatorLookup`] when the circuit is executed, not when it is built.

use crate::core::{EngineError, EngineResult};
use crate::matrix::Matrix;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A single circuit step: apply the named operator to the current state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Instruction {
    operator: String,
}

impl Instruction {
    pub fn new(operator: impl Into<String>) -> Self {
        Self { operator: operator.into() }
    }

    /// Name of the operator this instruction refers to.
    pub fn operator(&self) -> &str {
        &self.operator
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.operator)
    }
}

/// An ordered sequence of instructions, applied first to last.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Circuit {
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Creates a new, empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one instruction.
    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Returns a slice containing the ordered instructions.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Names referenced by the circuit that `operators` cannot resolve, in first-use order.
    pub fn unresolved<'a, L>(&'a self, operators: &L) -> Vec<&'a str>
    where
        L: OperatorLookup + ?Sized,
    {
        let mut missing: Vec<&str> = Vec::new();
        for instruction in &self.instructions {
            let name = instruction.operator();
            if operators.lookup(name).is_none() && !missing.contains(&name) {
                missing.push(name);
            }
        }
        missing
    }
}

impl<S: Into<String>> FromIterator<S> for Circuit {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { instructions: iter.into_iter().map(Instruction::new).collect() }
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instructions.is_empty() {
            return write!(f, "Circuit[empty]");
        }
        write!(f, "Circuit[")?;
        for (i, instruction) in self.instructions.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", instruction)?;
        }
        write!(f, "]")
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// A helper struct for programmatically constructing `Circuit` instances using method chaining.
///
/// ```
/// use qsquad::CircuitBuilder;
///
/// let circuit = CircuitBuilder::new().apply("H").apply("CX").apply("H").build();
/// assert_eq!(circuit.len(), 3);
/// assert_eq!(circuit.to_string(), "Circuit[H -> CX -> H]");
/// ```
#[derive(Debug, Default)]
pub struct CircuitBuilder {
    circuit: Circuit,
}

impl CircuitBuilder {
    /// Creates a new, empty CircuitBuilder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an application of the named operator.
    pub fn apply(mut self, operator: impl Into<String>) -> Self {
        self.circuit.push(Instruction::new(operator));
        self
    }

    /// Appends several operator applications in order.
    pub fn apply_all<I, S>(mut self, operators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for operator in operators {
            self.circuit.push(Instruction::new(operator));
        }
        self
    }

    /// Finalizes the construction process and returns the built `Circuit`.
    pub fn build(self) -> Circuit {
        self.circuit
    }
}

//-------------------------------------------------------------------------
// Operators
//-------------------------------------------------------------------------

/// Resolves an operator name to its matrix at execution time.
pub trait OperatorLookup {
    fn lookup(&self, name: &str) -> Option<&Arc<Matrix>>;
}

impl OperatorLookup for HashMap<String, Arc<Matrix>> {
    fn lookup(&self, name: &str) -> Option<&Arc<Matrix>> {
        self.get(name)
    }
}

/// Named operator matrices sharing a single dimension.
///
/// The dimension is fixed by the first definition. Matrices are kept behind
/// `Arc` so the worker pool can read them without copying.
#[derive(Debug, Clone, Default)]
pub struct OperatorTable {
    operators: HashMap<String, Arc<Matrix>>,
    // definition order, for listing
    order: Vec<String>,
    dimension: Option<usize>,
}

impl OperatorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named operator.
    ///
    /// # Errors
    /// * `EngineError::DuplicateOperator` if `name` is already defined; the
    ///   first definition stays in effect.
    /// * `EngineError::DimensionMismatch` if the matrix dimension differs from
    ///   the operators already defined.
    pub fn define(&mut self, name: impl Into<String>, matrix: Matrix) -> EngineResult<()> {
        let name = name.into();
        if self.operators.contains_key(&name) {
            return Err(EngineError::DuplicateOperator { name });
        }
        if let Some(dimension) = self.dimension {
            if matrix.dimension() != dimension {
                return Err(EngineError::mismatch("operator definition", dimension, matrix.dimension()));
            }
        }
        self.dimension = Some(matrix.dimension());
        self.order.push(name.clone());
        self.operators.insert(name, Arc::new(matrix));
        Ok(())
    }

    /// Builder-style variant of [`OperatorTable::define`].
    pub fn with(mut self, name: impl Into<String>, matrix: Matrix) -> EngineResult<Self> {
        self.define(name, matrix)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Matrix>> {
        self.operators.get(name)
    }

    /// Operator names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Shared dimension of the operators, `None` while the table is empty.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

impl OperatorLookup for OperatorTable {
    fn lookup(&self, name: &str) -> Option<&Arc<Matrix>> {
        self.get(name)
    }
}
