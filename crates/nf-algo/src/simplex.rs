//! Primal network simplex for capacitated min-cost flow.
//!
//! # Basis
//!
//! The spanning-tree basis lives on the network plus an artificial root.
//! Every node starts attached to the root by an uncapacitated artificial
//! arc carrying its whole supply:
//!
//! | Node supply | Artificial arc | Cost         | Potential    |
//! |-------------|----------------|--------------|--------------|
//! | `s >= 0`    | `u → root`     | 0            | 0            |
//! | `s < 0`     | `root → u`     | `ART_COST`   | `ART_COST`   |
//!
//! `ART_COST = (max |c| + 1) · (n + 1)` exceeds the cost of any simple path,
//! so flow leaves the artificial arcs whenever a real route exists.  Any
//! artificial flow left at optimum means the instance is infeasible.
//!
//! # Pivots
//!
//! * **Entering arc**: block search.  Arcs are scanned in blocks of about
//!   `√m` starting where the previous search stopped; the most violating arc
//!   of the first block holding any violation enters.  An arc is violating
//!   when `state · (c + π[s] − π[t]) < −tol`, with state `+1` at the lower
//!   bound and `−1` at the upper bound.
//! * **Leaving arc**: minimum residual capacity around the cycle closed by
//!   the entering arc, ties broken by the strongly-feasible-tree rule (the
//!   last blocking arc in cycle orientation).  This keeps every tree strongly
//!   feasible, so the method terminates without cycling.
//! * **Update**: flow moves around the cycle; the subtree cut off by the
//!   leaving arc is re-rooted along the path to the entering arc, and its
//!   potentials shift by a constant.
//!
//! An entering arc whose cycle has infinite residual capacity proves an
//! uncapacitated negative-cost cycle: the instance is unbounded.

use nf_core::{ArcId, EPSILON, FlowStatus, MalformedInput, NfResult};
use nf_net::InternalNet;

const NONE: usize = usize::MAX;

const STATE_UPPER: i8 = -1;
const STATE_TREE:  i8 = 0;
const STATE_LOWER: i8 = 1;

// ── Result ────────────────────────────────────────────────────────────────────

/// Outcome of one min-cost-flow solve.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct McfResult {
    pub status:     FlowStatus,
    /// Flow per arc, indexed by `ArcId`.
    pub flows:      Vec<f64>,
    /// `Σ flow · cost` over the network's arcs.  `-∞` when unbounded.
    pub total_cost: f64,
    /// Node potentials, indexed by `NodeId`.  At optimum every arc at its
    /// lower bound has reduced cost `c + π[s] − π[t] ≥ 0` and every arc at
    /// its upper bound `≤ 0`.
    pub potentials: Vec<f64>,
    pub pivots:     u64,
}

impl McfResult {
    #[inline]
    pub fn flow(&self, arc: ArcId) -> f64 {
        self.flows[arc.index()]
    }

    /// Arcs carrying positive flow, ascending.
    pub fn flow_arcs(&self) -> impl Iterator<Item = (ArcId, f64)> + '_ {
        self.flows
            .iter()
            .enumerate()
            .filter(|(_, f)| **f > 0.0)
            .map(|(i, &f)| (ArcId(i as u32), f))
    }
}

// ── MinCostFlowEngine trait ───────────────────────────────────────────────────

/// Min-cost-flow capability.
///
/// Input checks happen at entry: non-finite costs, negative or NaN
/// capacities and unequal supply and demand are rejected as
/// `MalformedInput`.  Negative costs are allowed.  Infeasible and unbounded
/// instances come back as a [`FlowStatus`], not an error.
pub trait MinCostFlowEngine: Send {
    fn solve(&mut self, net: &InternalNet) -> NfResult<McfResult>;
}

// ── NetworkSimplex ────────────────────────────────────────────────────────────

/// Primal network simplex with block-search pricing.
#[derive(Clone, Debug, Default)]
pub struct NetworkSimplex {
    /// Give up with `FlowStatus::Error` after this many pivots.  `None`
    /// relies on the pivot rule's termination guarantee.
    pub max_pivots: Option<u64>,
}

impl NetworkSimplex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_pivots(max_pivots: u64) -> Self {
        Self { max_pivots: Some(max_pivots) }
    }
}

impl MinCostFlowEngine for NetworkSimplex {
    fn solve(&mut self, net: &InternalNet) -> NfResult<McfResult> {
        net.check_finite_costs()?;
        net.check_capacities()?;
        check_balance(net)?;

        let mut state = SimplexState::new(net);
        let status = state.run(self.max_pivots);
        Ok(state.into_result(net, status))
    }
}

fn check_balance(net: &InternalNet) -> NfResult<()> {
    let supply = net.total_supply();
    let demand = net.total_demand();
    if (supply - demand).abs() > flow_tolerance(supply.max(demand)) {
        return Err(MalformedInput::Imbalance { supply, demand }.into());
    }
    Ok(())
}

#[inline]
fn flow_tolerance(scale: f64) -> f64 {
    EPSILON * scale.max(1.0)
}

// ── Per-solve state ───────────────────────────────────────────────────────────

/// Spanning-tree basis, flows and potentials of one solve.
///
/// Arcs `0..m` are the network's; arc `m + u` is node `u`'s artificial arc.
/// Node `n` is the artificial root.
struct SimplexState {
    n:     usize,
    m:     usize,

    source: Vec<usize>,
    target: Vec<usize>,
    cost:   Vec<f64>,
    cap:    Vec<f64>,
    flow:   Vec<f64>,
    state:  Vec<i8>,

    // ── Tree (indexed by node) ────────────────────────────────────────────
    parent:   Vec<usize>,
    /// Arc linking a node to its parent.
    pred:     Vec<usize>,
    /// `true` when `pred` points from the node up to its parent.
    up:       Vec<bool>,
    depth:    Vec<usize>,
    pi:       Vec<f64>,
    first_child: Vec<usize>,
    next_sib:    Vec<usize>,
    prev_sib:    Vec<usize>,

    // ── Pricing ───────────────────────────────────────────────────────────
    block_size: usize,
    next_arc:   usize,
    cost_tol:   f64,
    flow_tol:   f64,
    pivots:     u64,

    /// Scratch for subtree walks.
    stack: Vec<usize>,
}

impl SimplexState {
    fn new(net: &InternalNet) -> Self {
        let n = net.node_count();
        let m = net.arc_count();
        let root = n;
        let total = m + n;

        let max_cost = net.costs().iter().fold(0.0f64, |acc, c| acc.max(c.abs()));
        let art_cost = (max_cost + 1.0) * (n as f64 + 1.0);

        let mut source = Vec::with_capacity(total);
        let mut target = Vec::with_capacity(total);
        source.extend(net.sources().iter().map(|s| s.index()));
        target.extend(net.targets().iter().map(|t| t.index()));
        let mut cost = net.costs().to_vec();
        let mut cap = net.capacities().to_vec();
        let mut flow = vec![0.0; m];
        let mut state = vec![STATE_LOWER; m];

        let mut parent = vec![NONE; n + 1];
        let mut pred = vec![NONE; n + 1];
        let mut up = vec![false; n + 1];
        let mut depth = vec![0usize; n + 1];
        let mut pi = vec![0.0; n + 1];
        let mut first_child = vec![NONE; n + 1];
        let mut next_sib = vec![NONE; n + 1];
        let mut prev_sib = vec![NONE; n + 1];

        for (u, &s) in net.supplies().iter().enumerate() {
            let e = m + u;
            parent[u] = root;
            pred[u] = e;
            depth[u] = 1;
            cap.push(f64::INFINITY);
            state.push(STATE_TREE);
            if s >= 0.0 {
                source.push(u);
                target.push(root);
                cost.push(0.0);
                flow.push(s);
                up[u] = true;
                pi[u] = 0.0;
            } else {
                source.push(root);
                target.push(u);
                cost.push(art_cost);
                flow.push(-s);
                up[u] = false;
                pi[u] = art_cost;
            }
            // Children of the root in ascending order.
            if u > 0 {
                next_sib[u - 1] = u;
                prev_sib[u] = u - 1;
            }
        }
        if n > 0 {
            first_child[root] = 0;
        }

        let block_size = ((m as f64).sqrt().ceil() as usize).max(10).min(m.max(1));
        let supply_scale = net.total_supply();

        Self {
            n,
            m,
            source,
            target,
            cost,
            cap,
            flow,
            state,
            parent,
            pred,
            up,
            depth,
            pi,
            first_child,
            next_sib,
            prev_sib,
            block_size,
            next_arc: 0,
            cost_tol: EPSILON * (max_cost + 1.0),
            flow_tol: flow_tolerance(supply_scale),
            pivots: 0,
            stack: Vec::new(),
        }
    }

    // ── Main loop ─────────────────────────────────────────────────────────

    fn run(&mut self, max_pivots: Option<u64>) -> FlowStatus {
        while let Some(in_arc) = self.find_entering_arc() {
            if max_pivots.is_some_and(|limit| self.pivots >= limit) {
                return FlowStatus::Error;
            }
            if !self.pivot(in_arc) {
                return FlowStatus::Unbounded;
            }
            self.pivots += 1;
        }

        let artificial_flow = (self.m..self.m + self.n).any(|e| self.flow[e] > self.flow_tol);
        if artificial_flow {
            return FlowStatus::Infeasible;
        }
        FlowStatus::Optimal
    }

    #[inline]
    fn reduced_cost(&self, e: usize) -> f64 {
        self.cost[e] + self.pi[self.source[e]] - self.pi[self.target[e]]
    }

    /// Block search over the network's arcs.  Artificial arcs never
    /// re-enter the basis.
    fn find_entering_arc(&mut self) -> Option<usize> {
        let m = self.m;
        if m == 0 {
            return None;
        }
        let mut best = -self.cost_tol;
        let mut best_arc = NONE;
        let mut count = self.block_size;

        for step in 0..m {
            let e = (self.next_arc + step) % m;
            let c = self.state[e] as f64 * self.reduced_cost(e);
            if c < best {
                best = c;
                best_arc = e;
            }
            count -= 1;
            if count == 0 {
                if best_arc != NONE {
                    self.next_arc = (e + 1) % m;
                    return Some(best_arc);
                }
                count = self.block_size;
            }
        }
        if best_arc != NONE {
            self.next_arc = (best_arc + 1) % m;
            return Some(best_arc);
        }
        None
    }

    fn find_join(&self, mut u: usize, mut v: usize) -> usize {
        while u != v {
            if self.depth[u] > self.depth[v] {
                u = self.parent[u];
            } else {
                v = self.parent[v];
            }
        }
        u
    }

    /// Residual capacity of node `u`'s tree arc in the direction flow moves
    /// when it travels from `u` up towards the root (`toward_root`) or down
    /// from the root to `u`.
    #[inline]
    fn residual(&self, u: usize, toward_root: bool) -> f64 {
        let e = self.pred[u];
        if self.up[u] == toward_root {
            self.cap[e] - self.flow[e]
        } else {
            self.flow[e]
        }
    }

    /// Perform one pivot.  Returns `false` if the cycle is unbounded.
    fn pivot(&mut self, in_arc: usize) -> bool {
        let (first, second) = if self.state[in_arc] == STATE_LOWER {
            (self.source[in_arc], self.target[in_arc])
        } else {
            (self.target[in_arc], self.source[in_arc])
        };
        let join = self.find_join(first, second);

        // Leaving arc: flow enters the cycle at `first`'s side coming down
        // from `join`, crosses `in_arc`, and climbs from `second` to `join`.
        let mut delta = self.cap[in_arc];
        let mut u_out = NONE;
        let mut out_on_first = false;

        let mut u = first;
        while u != join {
            let d = self.residual(u, false);
            if d < delta {
                delta = d;
                u_out = u;
                out_on_first = true;
            }
            u = self.parent[u];
        }
        let mut u = second;
        while u != join {
            let d = self.residual(u, true);
            if d <= delta {
                delta = d;
                u_out = u;
                out_on_first = false;
            }
            u = self.parent[u];
        }

        if delta.is_infinite() {
            return false;
        }

        // Push `delta` around the cycle.
        if delta > 0.0 {
            let val = self.state[in_arc] as f64 * delta;
            self.flow[in_arc] += val;
            let mut u = self.source[in_arc];
            while u != join {
                let e = self.pred[u];
                if self.up[u] { self.flow[e] -= val } else { self.flow[e] += val }
                u = self.parent[u];
            }
            let mut u = self.target[in_arc];
            while u != join {
                let e = self.pred[u];
                if self.up[u] { self.flow[e] += val } else { self.flow[e] -= val }
                u = self.parent[u];
            }
        }

        if u_out == NONE {
            // The entering arc blocks itself and moves to its other bound.
            self.state[in_arc] = -self.state[in_arc];
            self.flow[in_arc] = if self.state[in_arc] == STATE_UPPER { self.cap[in_arc] } else { 0.0 };
            return true;
        }

        // The leaving arc sits at the bound its residual ran out against.
        let out_arc = self.pred[u_out];
        let to_upper = self.up[u_out] != out_on_first;
        if to_upper {
            self.state[out_arc] = STATE_UPPER;
            self.flow[out_arc] = self.cap[out_arc];
        } else {
            self.state[out_arc] = STATE_LOWER;
            self.flow[out_arc] = 0.0;
        }
        self.state[in_arc] = STATE_TREE;

        let (u_in, v_in) = if out_on_first { (first, second) } else { (second, first) };
        self.update_tree(in_arc, u_in, v_in, u_out);
        true
    }

    /// Re-hang the subtree cut off at `u_out` from `v_in` through `in_arc`,
    /// reversing the tree path `u_in → … → u_out`.
    fn update_tree(&mut self, in_arc: usize, u_in: usize, v_in: usize, u_out: usize) {
        let old_pi = self.pi[u_in];

        // Collect the path from u_in up to u_out.
        let mut path = Vec::new();
        let mut u = u_in;
        loop {
            path.push(u);
            if u == u_out {
                break;
            }
            u = self.parent[u];
        }

        let old_pred: Vec<usize> = path.iter().map(|&w| self.pred[w]).collect();
        let old_up: Vec<bool> = path.iter().map(|&w| self.up[w]).collect();
        for &w in &path {
            self.detach(w);
        }

        // u_in hangs from v_in through the entering arc.
        self.parent[u_in] = v_in;
        self.pred[u_in] = in_arc;
        self.up[u_in] = self.source[in_arc] == u_in;
        self.attach(u_in, v_in);

        // Each further path node hangs from its former child.
        for i in 1..path.len() {
            let w = path[i];
            self.parent[w] = path[i - 1];
            self.pred[w] = old_pred[i - 1];
            self.up[w] = !old_up[i - 1];
            self.attach(w, path[i - 1]);
        }

        let new_pi = if self.up[u_in] {
            self.pi[v_in] - self.cost[in_arc]
        } else {
            self.pi[v_in] + self.cost[in_arc]
        };
        let sigma = new_pi - old_pi;
        self.refresh_subtree(u_in, sigma);
    }

    fn detach(&mut self, w: usize) {
        let p = self.parent[w];
        let (prev, next) = (self.prev_sib[w], self.next_sib[w]);
        if prev == NONE {
            self.first_child[p] = next;
        } else {
            self.next_sib[prev] = next;
        }
        if next != NONE {
            self.prev_sib[next] = prev;
        }
        self.prev_sib[w] = NONE;
        self.next_sib[w] = NONE;
    }

    fn attach(&mut self, w: usize, p: usize) {
        let head = self.first_child[p];
        self.next_sib[w] = head;
        self.prev_sib[w] = NONE;
        if head != NONE {
            self.prev_sib[head] = w;
        }
        self.first_child[p] = w;
    }

    /// Recompute depths below `top` and shift its subtree's potentials.
    fn refresh_subtree(&mut self, top: usize, sigma: f64) {
        let mut stack = std::mem::take(&mut self.stack);
        stack.clear();
        stack.push(top);
        while let Some(u) = stack.pop() {
            self.depth[u] = self.depth[self.parent[u]] + 1;
            self.pi[u] += sigma;
            let mut c = self.first_child[u];
            while c != NONE {
                stack.push(c);
                c = self.next_sib[c];
            }
        }
        self.stack = stack;
    }

    // ── Result ────────────────────────────────────────────────────────────

    fn into_result(mut self, net: &InternalNet, status: FlowStatus) -> McfResult {
        let m = self.m;
        for f in &mut self.flow[..m] {
            if f.abs() <= self.flow_tol {
                *f = 0.0;
            }
        }
        let mut flows = self.flow;
        flows.truncate(m);

        let mut status = status;
        if status == FlowStatus::Optimal && !conserves(net, &flows, self.flow_tol) {
            status = FlowStatus::Error;
        }

        let total_cost = if status == FlowStatus::Unbounded {
            f64::NEG_INFINITY
        } else {
            flows.iter().zip(net.costs()).map(|(f, c)| f * c).sum()
        };

        let mut potentials = self.pi;
        potentials.truncate(self.n);

        McfResult { status, flows, total_cost, potentials, pivots: self.pivots }
    }
}

/// Conservation and bound check of a final flow.
fn conserves(net: &InternalNet, flows: &[f64], tol: f64) -> bool {
    let mut balance = net.supplies().to_vec();
    for arc in net.arcs() {
        let f = flows[arc.index()];
        if f < -tol || f > net.arc_capacity(arc) + tol {
            return false;
        }
        balance[net.arc_source(arc).index()] -= f;
        balance[net.arc_target(arc).index()] += f;
    }
    balance.iter().all(|b| b.abs() <= tol * 10.0)
}
