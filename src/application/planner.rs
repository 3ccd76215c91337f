use crate::domain::bank::{BankGraph, BankId};
use crate::domain::route::{RouteCandidate, RouteDetail, StepDetail};
use crate::error::Result;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::Arc;

/// Search depth used when quoting routes for a caller to choose from.
pub const DEFAULT_MAX_HOPS: usize = 3;
/// Extended depth used when creating a task without an explicit route.
pub const EXTENDED_MAX_HOPS: usize = 5;
/// Estimate used for duration descriptors that cannot be parsed.
pub const DEFAULT_DURATION_MINUTES: i64 = 120;

/// Parses a channel duration descriptor to a minutes estimate.
///
/// An immediate marker (`实时`, `immediate`) maps to 0. A bounded hour range
/// such as `2-4小时` or `2-4 hours` maps to the midpoint of the range in
/// minutes. Anything else maps to [`DEFAULT_DURATION_MINUTES`].
pub fn parse_duration_minutes(descriptor: &str) -> i64 {
    let s = descriptor.trim();
    if s == "实时" || s.eq_ignore_ascii_case("immediate") {
        return 0;
    }
    if let Some((low, high)) = parse_hour_range(s) {
        // Midpoint of the range, scaled to minutes.
        return (low + high) * 60 / 2;
    }
    DEFAULT_DURATION_MINUTES
}

fn parse_hour_range(s: &str) -> Option<(i64, i64)> {
    let (low, rest) = take_digits(s)?;
    let rest = rest.strip_prefix('-')?;
    let (high, rest) = take_digits(rest)?;
    let marker = rest.trim_start().to_ascii_lowercase();
    const HOUR_MARKERS: [&str; 6] = ["小时", "h", "hr", "hrs", "hour", "hours"];
    if HOUR_MARKERS.contains(&marker.as_str()) {
        Some((low, high))
    } else {
        None
    }
}

fn take_digits(s: &str) -> Option<(i64, &str)> {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    let value = s[..end].parse().ok()?;
    Some((value, &s[end..]))
}

/// Read-only route discovery and pricing over the bank graph.
///
/// Every method is a pure function of the graph and its arguments, so the
/// planner is safe to share and call concurrently.
pub struct RoutePlanner {
    graph: Arc<BankGraph>,
}

impl RoutePlanner {
    pub fn new(graph: Arc<BankGraph>) -> Self {
        Self { graph }
    }

    /// Enumerates loop-free routes from `from` to `to` by exhaustive
    /// depth-first search. `max_hops` caps the number of banks on a path. A
    /// path is emitted the moment it reaches the destination and is never
    /// extended past it.
    ///
    /// The result is ranked by hop count, then by the sum of fixed fee
    /// components, then by estimated duration. The fee key deliberately
    /// ignores percentage components, which are unknown without an amount;
    /// use [`calculate_route_details`](Self::calculate_route_details) for
    /// amount-aware pricing.
    pub fn find_routes(&self, from: BankId, to: BankId, max_hops: usize) -> Vec<RouteCandidate> {
        let mut routes = Vec::new();
        let mut visited = HashSet::new();
        let mut path = vec![from];
        self.search(
            from,
            to,
            max_hops,
            &mut visited,
            &mut path,
            Decimal::ZERO,
            0,
            &mut routes,
        );
        routes.sort_by(|a, b| {
            a.hops
                .cmp(&b.hops)
                .then(a.fixed_fees.cmp(&b.fixed_fees))
                .then(a.duration_minutes.cmp(&b.duration_minutes))
        });
        routes
    }

    #[allow(clippy::too_many_arguments)]
    fn search(
        &self,
        current: BankId,
        dest: BankId,
        max_hops: usize,
        visited: &mut HashSet<BankId>,
        path: &mut Vec<BankId>,
        fixed_fees: Decimal,
        duration_minutes: i64,
        out: &mut Vec<RouteCandidate>,
    ) {
        if path.len() > max_hops {
            return;
        }
        if current == dest {
            out.push(RouteCandidate {
                path: path.clone(),
                hops: path.len() - 1,
                fixed_fees,
                duration_minutes,
            });
            return;
        }
        visited.insert(current);
        if let Some(bank) = self.graph.get(current) {
            for channel in &bank.channels {
                if visited.contains(&channel.to) || self.graph.get(channel.to).is_none() {
                    continue;
                }
                path.push(channel.to);
                self.search(
                    channel.to,
                    dest,
                    max_hops,
                    visited,
                    path,
                    fixed_fees + channel.transfer_fee.fixed + channel.arrival_fee.fixed,
                    duration_minutes + parse_duration_minutes(&channel.expected_duration),
                    out,
                );
                path.pop();
            }
        }
        visited.remove(&current);
    }

    /// Prices a concrete route for `amount`.
    ///
    /// A route referencing a bank or channel missing from the graph fails
    /// with `BankNotFound`/`MissingChannel` instead of producing an
    /// incomplete breakdown.
    pub fn calculate_route_details(&self, route: &[BankId], amount: Decimal) -> Result<RouteDetail> {
        let mut steps = Vec::with_capacity(route.len().saturating_sub(1));
        let mut total_fees = Decimal::ZERO;
        let mut total_duration_minutes = 0i64;

        for pair in route.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let channel = self.graph.channel(from, to)?;
            let transfer_fee = channel.transfer_fee.amount_due(amount);
            let arrival_fee = channel.arrival_fee.amount_due(amount);
            let total_step_fee = transfer_fee + arrival_fee;
            let duration_minutes = parse_duration_minutes(&channel.expected_duration);

            steps.push(StepDetail {
                from,
                to,
                transfer_fee,
                arrival_fee,
                total_step_fee,
                expected_duration: channel.expected_duration.clone(),
                duration_minutes,
            });
            total_fees += total_step_fee;
            total_duration_minutes += duration_minutes;
        }

        Ok(RouteDetail {
            steps,
            total_fees,
            total_duration_minutes,
            net_amount: amount - total_fees,
        })
    }
}
