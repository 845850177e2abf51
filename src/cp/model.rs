//! CP model definition.

use std::collections::HashMap;

use super::variables::{BoolVar, IntVar};

/// Comparison operator of a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// Left-hand side ≤ rhs.
    Le,
    /// Left-hand side ≥ rhs.
    Ge,
    /// Left-hand side = rhs.
    Eq,
}

/// A constraint in the CP model.
///
/// The vocabulary is the fixed solving contract: linear (in)equalities
/// over integer and boolean variables, direct value fixing, equality
/// reification, and max/min aggregate equalities. Domain-specific
/// encodings (coverage sums, sliding windows) are built from these at
/// the consumer layer.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// `sum(coeff * var) op rhs`. Terms may reference integer or
    /// boolean variables; booleans contribute 0 or 1.
    Linear {
        /// (variable name, coefficient) pairs.
        terms: Vec<(String, i64)>,
        /// Comparison operator.
        op: CmpOp,
        /// Right-hand side.
        rhs: i64,
    },

    /// Direct equality: the integer variable takes exactly this value.
    FixInt {
        /// Integer variable name.
        var: String,
        /// Required value.
        value: i64,
    },

    /// Equality reification: `literal` is true if and only if `var`
    /// equals `value`, in both directions.
    ReifyEq {
        /// Boolean indicator name.
        literal: String,
        /// Integer variable name.
        var: String,
        /// Witnessed value.
        value: i64,
    },

    /// `target = max(operands)` over integer variables.
    MaxOf {
        /// Integer variable holding the maximum.
        target: String,
        /// Integer operand names (non-empty).
        operands: Vec<String>,
    },

    /// `target = min(operands)` over integer variables.
    MinOf {
        /// Integer variable holding the minimum.
        target: String,
        /// Integer operand names (non-empty).
        operands: Vec<String>,
    },
}

/// Objective function for the CP model.
///
/// Coefficients are integers: every objective this engine emits is a
/// count, and exact branch-and-bound needs integer arithmetic.
#[derive(Debug, Clone)]
pub enum Objective {
    /// Minimize a linear combination of variables.
    Minimize {
        /// (variable name, coefficient) pairs.
        terms: Vec<(String, i64)>,
    },

    /// Maximize a linear combination of variables.
    Maximize {
        /// (variable name, coefficient) pairs.
        terms: Vec<(String, i64)>,
    },
}

/// A constraint programming model.
///
/// Contains variables, constraints, and an optional objective. Integer
/// variables keep their insertion order — conforming backends branch on
/// them in that order, which makes solving deterministic.
///
/// # Examples
///
/// ```
/// use shift_planner::cp::{CpModel, IntVar, BoolVar, CmpOp};
///
/// let mut model = CpModel::new("example");
/// model.add_int_var(IntVar::new("x", 0, 2));
/// model.add_bool_var(BoolVar::new("x_is_1"));
/// model.reify_eq("x_is_1", "x", 1);
/// model.add_linear(vec![("x_is_1".into(), 1)], CmpOp::Ge, 1);
/// assert!(model.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CpModel {
    /// Model name.
    pub name: String,
    /// Constraints, in emission order.
    pub constraints: Vec<Constraint>,
    /// Objective function.
    pub objective: Option<Objective>,
    int_vars: Vec<IntVar>,
    bool_vars: Vec<BoolVar>,
    int_index: HashMap<String, usize>,
    bool_index: HashMap<String, usize>,
}

impl CpModel {
    /// Creates a new empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds an integer variable. A variable with the same name replaces
    /// the earlier definition in place.
    pub fn add_int_var(&mut self, var: IntVar) {
        match self.int_index.get(&var.name) {
            Some(&idx) => self.int_vars[idx] = var,
            None => {
                self.int_index.insert(var.name.clone(), self.int_vars.len());
                self.int_vars.push(var);
            }
        }
    }

    /// Adds a boolean variable.
    pub fn add_bool_var(&mut self, var: BoolVar) {
        match self.bool_index.get(&var.name) {
            Some(&idx) => self.bool_vars[idx] = var,
            None => {
                self.bool_index
                    .insert(var.name.clone(), self.bool_vars.len());
                self.bool_vars.push(var);
            }
        }
    }

    /// Adds a constraint.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Convenience: add a linear constraint.
    pub fn add_linear(&mut self, terms: Vec<(String, i64)>, op: CmpOp, rhs: i64) {
        self.constraints.push(Constraint::Linear { terms, op, rhs });
    }

    /// Convenience: fix an integer variable to a value.
    pub fn fix_int(&mut self, var: impl Into<String>, value: i64) {
        self.constraints.push(Constraint::FixInt {
            var: var.into(),
            value,
        });
    }

    /// Convenience: reify `literal ⇔ (var == value)`.
    pub fn reify_eq(&mut self, literal: impl Into<String>, var: impl Into<String>, value: i64) {
        self.constraints.push(Constraint::ReifyEq {
            literal: literal.into(),
            var: var.into(),
            value,
        });
    }

    /// Convenience: `target = max(operands)`.
    pub fn add_max_of(&mut self, target: impl Into<String>, operands: Vec<String>) {
        self.constraints.push(Constraint::MaxOf {
            target: target.into(),
            operands,
        });
    }

    /// Convenience: `target = min(operands)`.
    pub fn add_min_of(&mut self, target: impl Into<String>, operands: Vec<String>) {
        self.constraints.push(Constraint::MinOf {
            target: target.into(),
            operands,
        });
    }

    /// Sets the objective function.
    pub fn set_objective(&mut self, objective: Objective) {
        self.objective = Some(objective);
    }

    /// Integer variables in insertion order.
    pub fn int_vars(&self) -> &[IntVar] {
        &self.int_vars
    }

    /// Boolean variables in insertion order.
    pub fn bool_vars(&self) -> &[BoolVar] {
        &self.bool_vars
    }

    /// Index of an integer variable by name.
    pub fn int_index_of(&self, name: &str) -> Option<usize> {
        self.int_index.get(name).copied()
    }

    /// Index of a boolean variable by name.
    pub fn bool_index_of(&self, name: &str) -> Option<usize> {
        self.bool_index.get(name).copied()
    }

    /// Whether a name refers to any variable in the model.
    pub fn has_var(&self, name: &str) -> bool {
        self.int_index.contains_key(name) || self.bool_index.contains_key(name)
    }

    /// Number of integer variables.
    pub fn int_var_count(&self) -> usize {
        self.int_vars.len()
    }

    /// Number of boolean variables.
    pub fn bool_var_count(&self) -> usize {
        self.bool_vars.len()
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Validates the model for consistency.
    ///
    /// Checks that every referenced variable name exists and has the
    /// kind the constraint expects.
    pub fn validate(&self) -> Result<(), String> {
        for constraint in &self.constraints {
            match constraint {
                Constraint::Linear { terms, .. } => {
                    for (name, _) in terms {
                        if !self.has_var(name) {
                            return Err(format!("undefined variable: {name}"));
                        }
                    }
                }
                Constraint::FixInt { var, .. } => {
                    if self.int_index_of(var).is_none() {
                        return Err(format!("undefined integer variable: {var}"));
                    }
                }
                Constraint::ReifyEq { literal, var, .. } => {
                    if self.bool_index_of(literal).is_none() {
                        return Err(format!("undefined boolean variable: {literal}"));
                    }
                    if self.int_index_of(var).is_none() {
                        return Err(format!("undefined integer variable: {var}"));
                    }
                }
                Constraint::MaxOf { target, operands } | Constraint::MinOf { target, operands } => {
                    if operands.is_empty() {
                        return Err(format!("aggregate over empty operands: {target}"));
                    }
                    if self.int_index_of(target).is_none() {
                        return Err(format!("undefined integer variable: {target}"));
                    }
                    for name in operands {
                        if self.int_index_of(name).is_none() {
                            return Err(format!("undefined integer variable: {name}"));
                        }
                    }
                }
            }
        }

        if let Some(Objective::Minimize { terms } | Objective::Maximize { terms }) =
            &self.objective
        {
            for (name, _) in terms {
                if !self.has_var(name) {
                    return Err(format!("undefined variable in objective: {name}"));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_creation() {
        let mut model = CpModel::new("test");
        model.add_int_var(IntVar::new("x", 0, 2));
        model.add_bool_var(BoolVar::new("x1"));
        model.reify_eq("x1", "x", 1);
        model.add_linear(vec![("x1".into(), 1)], CmpOp::Ge, 1);

        assert_eq!(model.int_var_count(), 1);
        assert_eq!(model.bool_var_count(), 1);
        assert_eq!(model.constraint_count(), 2);
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_int_vars_keep_insertion_order() {
        let mut model = CpModel::new("test");
        model.add_int_var(IntVar::new("b", 0, 1));
        model.add_int_var(IntVar::new("a", 0, 1));
        let names: Vec<_> = model.int_vars().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_redefinition_replaces_in_place() {
        let mut model = CpModel::new("test");
        model.add_int_var(IntVar::new("x", 0, 10));
        model.add_int_var(IntVar::new("x", 0, 2));
        assert_eq!(model.int_var_count(), 1);
        assert_eq!(model.int_vars()[0].max, 2);
    }

    #[test]
    fn test_undefined_reference() {
        let mut model = CpModel::new("test");
        model.add_linear(vec![("ghost".into(), 1)], CmpOp::Ge, 1);
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_reify_kind_check() {
        let mut model = CpModel::new("test");
        model.add_int_var(IntVar::new("x", 0, 2));
        // Literal must be a declared boolean.
        model.reify_eq("x_is_1", "x", 1);
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_empty_aggregate_rejected() {
        let mut model = CpModel::new("test");
        model.add_int_var(IntVar::new("m", 0, 5));
        model.add_max_of("m", vec![]);
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_objective_reference_check() {
        let mut model = CpModel::new("test");
        model.set_objective(Objective::Minimize {
            terms: vec![("missing".into(), 1)],
        });
        assert!(model.validate().is_err());
    }
}
