//! CP solver interface and a deterministic backtracking backend.

use std::collections::HashMap;
use std::time::Instant;

use super::model::{CmpOp, Constraint, CpModel, Objective};

/// Status of the solver after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    /// Proven optimal solution found.
    Optimal,
    /// Feasible (but not necessarily optimal) solution found.
    Feasible,
    /// No feasible solution exists.
    Infeasible,
    /// Model is invalid or malformed.
    ModelInvalid,
    /// Time budget exhausted before any solution was found.
    Timeout,
    /// Work budget exhausted before any solution was found.
    Unknown,
}

/// Solution from a CP solver.
///
/// On `Optimal` or `Feasible` every variable in the model carries a
/// concrete value.
#[derive(Debug, Clone)]
pub struct CpSolution {
    /// Solver status.
    pub status: SolverStatus,
    /// Objective function value (if an objective was set).
    pub objective_value: Option<i64>,
    /// Integer variable assignments.
    pub int_values: HashMap<String, i64>,
    /// Boolean variable assignments.
    pub bool_values: HashMap<String, bool>,
    /// Solve time in milliseconds.
    pub solve_time_ms: i64,
    /// Branching decisions explored.
    pub decisions: u64,
}

impl CpSolution {
    /// Creates an empty solution with the given status.
    pub fn empty(status: SolverStatus) -> Self {
        Self {
            status,
            objective_value: None,
            int_values: HashMap::new(),
            bool_values: HashMap::new(),
            solve_time_ms: 0,
            decisions: 0,
        }
    }

    /// Whether a feasible solution was found.
    pub fn is_solution_found(&self) -> bool {
        matches!(self.status, SolverStatus::Optimal | SolverStatus::Feasible)
    }
}

/// Solver budget and search configuration.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Maximum wall-clock solve time in milliseconds.
    pub time_limit_ms: i64,
    /// Maximum branching decisions.
    pub decision_limit: u64,
    /// Stop after the first feasible solution even when an objective
    /// is set.
    pub stop_after_first: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 10_000,
            decision_limit: 2_000_000,
            stop_after_first: false,
        }
    }
}

/// Trait for CP solver implementations.
///
/// Implementors provide the actual constraint solving logic. This can
/// wrap external solvers (e.g. OR-Tools CP-SAT) or provide custom
/// search. The contract: on `Optimal`/`Feasible` the solution assigns
/// every variable; budget expiry without a solution must surface as
/// `Timeout`/`Unknown`, never as `Infeasible`.
pub trait CpSolver {
    /// Solves the model within the configured budget.
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution;
}

/// Deterministic depth-first backtracking solver.
///
/// Branches on the first open variable of the unresolved row with the
/// least slack (model insertion order breaks ties and covers rowless
/// variables), trying domain values ascending. Boolean literals are
/// never branched on: each must be the literal of exactly one
/// `ReifyEq` and is propagated from its integer variable. Integer
/// variables that are functionally determined (linear-equality
/// counters, max/min targets) are forced, not enumerated. Pruning is
/// bounds-based per constraint row, plus branch-and-bound on the
/// objective once an incumbent exists. After every assignment, tight
/// `>=` rows are propagated to fixpoint: when a row's attainable
/// maximum exactly equals its requirement, every still-open
/// contributor is assigned its contributing value without spending a
/// branching decision.
///
/// Exhausting the search space proves `Optimal` (with incumbent and
/// objective) or `Infeasible` (without incumbent). Budget expiry keeps
/// the incumbent as `Feasible`, or reports `Timeout`/`Unknown`.
pub struct BacktrackingSolver;

impl BacktrackingSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BacktrackingSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CpSolver for BacktrackingSolver {
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution {
        let started = Instant::now();

        if model.validate().is_err() {
            return CpSolution::empty(SolverStatus::ModelInvalid);
        }

        let mut search = match Search::build(model, config, started) {
            Ok(search) => search,
            Err(status) => return CpSolution::empty(status),
        };

        let status = search.run();
        let mut solution = CpSolution::empty(status);
        solution.decisions = search.decisions;
        solution.solve_time_ms = started.elapsed().as_millis() as i64;

        if solution.is_solution_found() {
            let (objective_value, ints, bools) = search.best.expect("incumbent present");
            solution.objective_value = model.objective.as_ref().map(|_| objective_value);
            for (idx, var) in model.int_vars().iter().enumerate() {
                solution.int_values.insert(var.name.clone(), ints[idx]);
            }
            for (idx, var) in model.bool_vars().iter().enumerate() {
                solution.bool_values.insert(var.name.clone(), bools[idx]);
            }
        }

        solution
    }
}

#[derive(Debug, Clone, Copy)]
enum VarRef {
    Int(usize),
    Bool(usize),
}

struct LinRow {
    terms: Vec<(VarRef, i64)>,
    op: CmpOp,
    rhs: i64,
}

struct Aggregate {
    target: usize,
    operands: Vec<usize>,
    is_max: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Abort {
    Time,
    Decisions,
    FirstFound,
}

enum Forced {
    Free,
    Value(i64),
    Conflict,
}

struct Search {
    domains: Vec<(i64, i64)>,
    int_vals: Vec<Option<i64>>,
    bool_vals: Vec<Option<bool>>,
    fixed_bools: Vec<Option<bool>>,
    rows: Vec<LinRow>,
    /// Reified literals per integer variable: (bool index, witnessed value).
    reify: Vec<Vec<(usize, i64)>>,
    /// Owning integer variable and witnessed value per literal.
    literal_owner: Vec<(usize, i64)>,
    /// Row indices to re-check when an integer variable is assigned.
    watches: Vec<Vec<usize>>,
    /// Equality rows that can force an integer variable's value.
    eq_defs: Vec<Vec<usize>>,
    aggregates: Vec<Aggregate>,
    /// True for minimize, with the compiled objective terms.
    objective: Option<(bool, Vec<(VarRef, i64)>)>,
    decisions: u64,
    decision_limit: u64,
    time_limit_ms: i64,
    started: Instant,
    stop_after_first: bool,
    aborted: Option<Abort>,
    /// Incumbent: (objective value, int snapshot, bool snapshot).
    best: Option<(i64, Vec<i64>, Vec<bool>)>,
}

impl Search {
    fn build(
        model: &CpModel,
        config: &SolverConfig,
        started: Instant,
    ) -> Result<Self, SolverStatus> {
        let n_ints = model.int_var_count();
        let n_bools = model.bool_var_count();

        let mut domains = Vec::with_capacity(n_ints);
        for var in model.int_vars() {
            if var.min > var.max {
                return Err(SolverStatus::Infeasible);
            }
            domains.push((var.min, var.max));
        }

        let fixed_bools: Vec<Option<bool>> =
            model.bool_vars().iter().map(|v| v.fixed).collect();

        let term_ref = |name: &str| -> VarRef {
            // validate() already guaranteed existence.
            match model.int_index_of(name) {
                Some(idx) => VarRef::Int(idx),
                None => VarRef::Bool(model.bool_index_of(name).expect("validated name")),
            }
        };

        let mut rows = Vec::new();
        let mut reify: Vec<Vec<(usize, i64)>> = vec![Vec::new(); n_ints];
        let mut owners: Vec<Option<(usize, i64)>> = vec![None; n_bools];
        let mut aggregates = Vec::new();

        for constraint in &model.constraints {
            match constraint {
                Constraint::Linear { terms, op, rhs } => {
                    rows.push(LinRow {
                        terms: terms.iter().map(|(n, c)| (term_ref(n), *c)).collect(),
                        op: *op,
                        rhs: *rhs,
                    });
                }
                Constraint::FixInt { var, value } => {
                    let idx = model.int_index_of(var).expect("validated name");
                    let (lo, hi) = domains[idx];
                    if *value < lo || *value > hi {
                        return Err(SolverStatus::Infeasible);
                    }
                    domains[idx] = (*value, *value);
                }
                Constraint::ReifyEq {
                    literal,
                    var,
                    value,
                } => {
                    let b = model.bool_index_of(literal).expect("validated name");
                    let v = model.int_index_of(var).expect("validated name");
                    if owners[b].is_some() {
                        // A literal may witness only one equality.
                        return Err(SolverStatus::ModelInvalid);
                    }
                    owners[b] = Some((v, *value));
                    reify[v].push((b, *value));
                }
                Constraint::MaxOf { target, operands } | Constraint::MinOf { target, operands } => {
                    aggregates.push(Aggregate {
                        target: model.int_index_of(target).expect("validated name"),
                        operands: operands
                            .iter()
                            .map(|n| model.int_index_of(n).expect("validated name"))
                            .collect(),
                        is_max: matches!(constraint, Constraint::MaxOf { .. }),
                    });
                }
            }
        }

        // Every boolean must be a reified literal; there is nothing else
        // that could ever assign one.
        if owners.iter().any(|owner| owner.is_none()) {
            return Err(SolverStatus::ModelInvalid);
        }
        let literal_owner: Vec<(usize, i64)> = owners
            .into_iter()
            .map(|owner| owner.expect("owned literal"))
            .collect();

        let mut watches: Vec<Vec<usize>> = vec![Vec::new(); n_ints];
        let mut eq_defs: Vec<Vec<usize>> = vec![Vec::new(); n_ints];
        for (row_idx, row) in rows.iter().enumerate() {
            for &(var_ref, _) in &row.terms {
                let int_idx = match var_ref {
                    VarRef::Int(idx) => idx,
                    VarRef::Bool(idx) => literal_owner[idx].0,
                };
                if !watches[int_idx].contains(&row_idx) {
                    watches[int_idx].push(row_idx);
                }
                if row.op == CmpOp::Eq {
                    if let VarRef::Int(idx) = var_ref {
                        if !eq_defs[idx].contains(&row_idx) {
                            eq_defs[idx].push(row_idx);
                        }
                    }
                }
            }
        }

        let objective = model.objective.as_ref().map(|obj| match obj {
            Objective::Minimize { terms } => {
                (true, terms.iter().map(|(n, c)| (term_ref(n), *c)).collect())
            }
            Objective::Maximize { terms } => {
                (false, terms.iter().map(|(n, c)| (term_ref(n), *c)).collect())
            }
        });

        Ok(Self {
            domains,
            int_vals: vec![None; n_ints],
            bool_vals: vec![None; n_bools],
            fixed_bools,
            rows,
            reify,
            literal_owner,
            watches,
            eq_defs,
            aggregates,
            objective,
            decisions: 0,
            decision_limit: config.decision_limit,
            time_limit_ms: config.time_limit_ms,
            started,
            stop_after_first: config.stop_after_first,
            aborted: None,
            best: None,
        })
    }

    fn run(&mut self) -> SolverStatus {
        // Root consistency: catches empty-sum rows and fixed conflicts
        // before any branching.
        for row_idx in 0..self.rows.len() {
            if !self.check_row(row_idx) {
                return SolverStatus::Infeasible;
            }
        }
        let mut root_forced = Vec::new();
        if !self.propagate(&mut root_forced) {
            return SolverStatus::Infeasible;
        }

        self.dfs();

        match self.aborted {
            Some(Abort::FirstFound) => SolverStatus::Feasible,
            Some(Abort::Time) => {
                if self.best.is_some() {
                    SolverStatus::Feasible
                } else {
                    SolverStatus::Timeout
                }
            }
            Some(Abort::Decisions) => {
                if self.best.is_some() {
                    SolverStatus::Feasible
                } else {
                    SolverStatus::Unknown
                }
            }
            None => match (&self.best, &self.objective) {
                (Some(_), Some(_)) => SolverStatus::Optimal,
                (Some(_), None) => SolverStatus::Feasible,
                (None, _) => SolverStatus::Infeasible,
            },
        }
    }

    /// Returns true when the search must stop entirely.
    fn dfs(&mut self) -> bool {
        let Some(pos) = self.select_branch_var() else {
            return self.record_solution();
        };

        let (lo, hi) = match self.forced_value(pos) {
            Forced::Conflict => return false,
            Forced::Value(value) => (value, value),
            Forced::Free => self.domains[pos],
        };
        for value in lo..=hi {
            self.decisions += 1;
            if self.decisions > self.decision_limit {
                self.aborted = Some(Abort::Decisions);
                return true;
            }
            if self.decisions % 256 == 0
                && self.started.elapsed().as_millis() as i64 >= self.time_limit_ms
            {
                self.aborted = Some(Abort::Time);
                return true;
            }

            self.int_vals[pos] = Some(value);
            let mut consistent = self.set_literals(pos);
            if consistent {
                consistent = self.consistent_after(pos);
            }
            let mut forced = Vec::new();
            if consistent {
                consistent = self.propagate(&mut forced);
            }
            if consistent && self.dfs() {
                return true;
            }

            while let Some(idx) = forced.pop() {
                self.clear_int(idx);
            }
            self.clear_int(pos);
        }

        false
    }

    /// Picks the next branching variable: the first open variable of
    /// the unresolved row with the least slack, so the search always
    /// works on the constraint closest to failing. Falls back to the
    /// lowest-index unassigned variable when every row is settled.
    fn select_branch_var(&self) -> Option<usize> {
        let mut best: Option<(i64, usize)> = None;
        for row in &self.rows {
            let (lo, hi) = self.term_bounds(&row.terms);
            let slack = match row.op {
                CmpOp::Ge => {
                    if lo >= row.rhs {
                        continue;
                    }
                    hi - row.rhs
                }
                CmpOp::Le => {
                    if hi <= row.rhs {
                        continue;
                    }
                    row.rhs - lo
                }
                CmpOp::Eq => {
                    if lo == hi {
                        continue;
                    }
                    (hi - row.rhs).min(row.rhs - lo)
                }
            };
            if let Some((current, _)) = best {
                if slack >= current {
                    continue;
                }
            }
            if let Some(var) = self.first_open_var(&row.terms) {
                best = Some((slack, var));
            }
        }
        if let Some((_, var)) = best {
            return Some(var);
        }
        self.int_vals.iter().position(|value| value.is_none())
    }

    fn first_open_var(&self, terms: &[(VarRef, i64)]) -> Option<usize> {
        for &(var_ref, _) in terms {
            let idx = match var_ref {
                VarRef::Int(idx) => idx,
                VarRef::Bool(idx) => self.literal_owner[idx].0,
            };
            if self.int_vals[idx].is_none() {
                return Some(idx);
            }
        }
        None
    }

    /// Propagates the reified literals of a freshly assigned integer
    /// variable. Returns false on conflict with a pinned literal.
    fn set_literals(&mut self, pos: usize) -> bool {
        let value = self.int_vals[pos].expect("assigned");
        let mut consistent = true;
        for idx in 0..self.reify[pos].len() {
            let (literal, witnessed) = self.reify[pos][idx];
            let truth = value == witnessed;
            if let Some(required) = self.fixed_bools[literal] {
                if required != truth {
                    consistent = false;
                }
            }
            self.bool_vals[literal] = Some(truth);
        }
        consistent
    }

    fn clear_int(&mut self, pos: usize) {
        for &(literal, _) in &self.reify[pos] {
            self.bool_vals[literal] = None;
        }
        self.int_vals[pos] = None;
    }

    /// Truth of a literal when it is already determined: assigned,
    /// pinned, or decided statically by its owner's domain.
    fn literal_truth(&self, idx: usize) -> Option<bool> {
        self.bool_vals[idx].or(self.fixed_bools[idx]).or_else(|| {
            let (owner, witnessed) = self.literal_owner[idx];
            let (lo, hi) = self.domains[owner];
            if witnessed < lo || witnessed > hi {
                Some(false)
            } else if lo == hi {
                Some(true)
            } else {
                None
            }
        })
    }

    /// Fixpoint propagation of tight `>=` rows.
    ///
    /// A row whose attainable maximum has dropped to exactly its
    /// right-hand side can only be met if every open contributor takes
    /// its contributing value, so those assignments are made directly.
    /// Forced variables are pushed onto `trail` for undo on backtrack.
    fn propagate(&mut self, trail: &mut Vec<usize>) -> bool {
        loop {
            let mut fixed_any = false;
            for row_idx in 0..self.rows.len() {
                if self.rows[row_idx].op != CmpOp::Ge {
                    continue;
                }
                let (_, hi) = self.term_bounds(&self.rows[row_idx].terms);
                if hi < self.rows[row_idx].rhs {
                    return false;
                }
                if hi > self.rows[row_idx].rhs {
                    continue;
                }

                let mut row_forced: Vec<(usize, i64)> = Vec::new();
                for &(var_ref, coeff) in &self.rows[row_idx].terms {
                    match var_ref {
                        VarRef::Int(idx) => {
                            let (lo, hi) = self.domains[idx];
                            if coeff != 0 && self.int_vals[idx].is_none() && lo != hi {
                                row_forced.push((idx, if coeff > 0 { hi } else { lo }));
                            }
                        }
                        VarRef::Bool(idx) => {
                            if coeff > 0 && self.literal_truth(idx).is_none() {
                                row_forced.push(self.literal_owner[idx]);
                            }
                        }
                    }
                }
                for (idx, value) in row_forced {
                    match self.int_vals[idx] {
                        // A forcing earlier in this pass may have got
                        // there first.
                        Some(current) => {
                            if current != value {
                                return false;
                            }
                        }
                        None => {
                            if !self.force_int(idx, value, trail) {
                                return false;
                            }
                            fixed_any = true;
                        }
                    }
                }
            }
            if !fixed_any {
                return true;
            }
        }
    }

    fn force_int(&mut self, idx: usize, value: i64, trail: &mut Vec<usize>) -> bool {
        let (lo, hi) = self.domains[idx];
        if value < lo || value > hi {
            return false;
        }
        self.int_vals[idx] = Some(value);
        trail.push(idx);
        self.set_literals(idx) && self.consistent_after(idx)
    }

    /// Detects a functionally determined value for the variable at
    /// `pos`: an equality row where every other term is assigned, or a
    /// max/min aggregate whose operands are all assigned.
    fn forced_value(&self, pos: usize) -> Forced {
        for aggregate in &self.aggregates {
            if aggregate.target != pos {
                continue;
            }
            let mut extreme: Option<i64> = None;
            let mut all_assigned = true;
            for &operand in &aggregate.operands {
                match self.int_vals[operand] {
                    Some(value) => {
                        extreme = Some(match extreme {
                            None => value,
                            Some(current) if aggregate.is_max => current.max(value),
                            Some(current) => current.min(value),
                        });
                    }
                    None => {
                        all_assigned = false;
                        break;
                    }
                }
            }
            if all_assigned {
                let value = extreme.expect("non-empty operands");
                let (lo, hi) = self.domains[pos];
                if value < lo || value > hi {
                    return Forced::Conflict;
                }
                return Forced::Value(value);
            }
        }

        'rows: for &row_idx in &self.eq_defs[pos] {
            let row = &self.rows[row_idx];
            let mut own_coeff = 0i64;
            let mut others = 0i64;
            for &(var_ref, coeff) in &row.terms {
                match var_ref {
                    VarRef::Int(idx) if idx == pos => own_coeff += coeff,
                    VarRef::Int(idx) => match self.int_vals[idx] {
                        Some(value) => others += coeff * value,
                        None => continue 'rows,
                    },
                    VarRef::Bool(idx) => match self.bool_vals[idx] {
                        Some(true) => others += coeff,
                        Some(false) => {}
                        None => continue 'rows,
                    },
                }
            }
            if own_coeff == 0 {
                continue;
            }
            let remainder = row.rhs - others;
            if remainder % own_coeff != 0 {
                return Forced::Conflict;
            }
            let value = remainder / own_coeff;
            let (lo, hi) = self.domains[pos];
            if value < lo || value > hi {
                return Forced::Conflict;
            }
            return Forced::Value(value);
        }

        Forced::Free
    }

    fn consistent_after(&self, pos: usize) -> bool {
        for &row_idx in &self.watches[pos] {
            if !self.check_row(row_idx) {
                return false;
            }
        }

        for aggregate in &self.aggregates {
            if !self.check_aggregate(aggregate) {
                return false;
            }
        }

        self.objective_bound_ok()
    }

    fn check_row(&self, row_idx: usize) -> bool {
        let row = &self.rows[row_idx];
        let (lo, hi) = self.term_bounds(&row.terms);
        match row.op {
            CmpOp::Ge => hi >= row.rhs,
            CmpOp::Le => lo <= row.rhs,
            CmpOp::Eq => lo <= row.rhs && row.rhs <= hi,
        }
    }

    /// Verified only once fully assigned; until then the forcing rule
    /// in `forced_value` keeps targets consistent by construction.
    fn check_aggregate(&self, aggregate: &Aggregate) -> bool {
        let Some(target) = self.int_vals[aggregate.target] else {
            return true;
        };
        let mut extreme: Option<i64> = None;
        for &operand in &aggregate.operands {
            match self.int_vals[operand] {
                Some(value) => {
                    extreme = Some(match extreme {
                        None => value,
                        Some(current) if aggregate.is_max => current.max(value),
                        Some(current) => current.min(value),
                    });
                }
                None => return true,
            }
        }
        extreme == Some(target)
    }

    fn objective_bound_ok(&self) -> bool {
        let (Some((minimize, terms)), Some((best, _, _))) = (&self.objective, &self.best) else {
            return true;
        };
        let (lo, hi) = self.term_bounds(terms);
        if *minimize {
            lo < *best
        } else {
            hi > *best
        }
    }

    fn term_bounds(&self, terms: &[(VarRef, i64)]) -> (i64, i64) {
        let mut lo = 0i64;
        let mut hi = 0i64;
        for &(var_ref, coeff) in terms {
            match var_ref {
                VarRef::Int(idx) => match self.int_vals[idx] {
                    Some(value) => {
                        lo += coeff * value;
                        hi += coeff * value;
                    }
                    None => {
                        let (dlo, dhi) = self.domains[idx];
                        if coeff >= 0 {
                            lo += coeff * dlo;
                            hi += coeff * dhi;
                        } else {
                            lo += coeff * dhi;
                            hi += coeff * dlo;
                        }
                    }
                },
                VarRef::Bool(idx) => {
                    match self.literal_truth(idx) {
                        Some(true) => {
                            lo += coeff;
                            hi += coeff;
                        }
                        Some(false) => {}
                        None => {
                            lo += coeff.min(0);
                            hi += coeff.max(0);
                        }
                    }
                }
            }
        }
        (lo, hi)
    }

    /// Returns true when the search must stop entirely.
    fn record_solution(&mut self) -> bool {
        let ints: Vec<i64> = self.int_vals.iter().map(|v| v.expect("assigned")).collect();
        let bools: Vec<bool> = self
            .bool_vals
            .iter()
            .map(|v| v.expect("propagated literal"))
            .collect();

        match &self.objective {
            None => {
                self.best = Some((0, ints, bools));
                self.aborted = Some(Abort::FirstFound);
                true
            }
            Some((minimize, terms)) => {
                let mut value = 0i64;
                for &(var_ref, coeff) in terms {
                    value += coeff
                        * match var_ref {
                            VarRef::Int(idx) => ints[idx],
                            VarRef::Bool(idx) => i64::from(bools[idx]),
                        };
                }
                let improves = match &self.best {
                    None => true,
                    Some((best, _, _)) => {
                        if *minimize {
                            value < *best
                        } else {
                            value > *best
                        }
                    }
                };
                if improves {
                    self.best = Some((value, ints, bools));
                }
                if self.stop_after_first {
                    self.aborted = Some(Abort::FirstFound);
                    return true;
                }
                false
            }
        }
    }
}
