//! Minimum cost assignment of boxes (rows) to goals (columns).

/// Cost of a pair which can never be matched.
/// Large enough that any real total is smaller, small enough that summing 254 of them doesn't overflow.
pub(crate) const UNREACHABLE: i64 = 1 << 40;

/// Hungarian algorithm (Kuhn-Munkres with potentials), O(rows^2 * cols).
///
/// Every row gets a distinct column so there must not be more rows than columns.
/// Returns the total cost and the column assigned to each row.
/// Ties are resolved by row and column order.
pub(crate) fn hungarian(costs: &[Vec<i64>]) -> (i64, Vec<usize>) {
    let rows = costs.len();
    if rows == 0 {
        return (0, Vec::new());
    }
    let cols = costs[0].len();
    debug_assert!(rows <= cols, "{} rows but only {} columns", rows, cols);

    // 1-based, index 0 is a virtual column the current row starts from
    let inf = i64::max_value() / 4;
    let mut row_potential = vec![0; rows + 1];
    let mut col_potential = vec![0; cols + 1];
    let mut col_owner = vec![0_usize; cols + 1];
    let mut way = vec![0_usize; cols + 1];

    for row in 1..=rows {
        col_owner[0] = row;
        let mut cur_col = 0;
        let mut min_slack = vec![inf; cols + 1];
        let mut used = vec![false; cols + 1];

        loop {
            used[cur_col] = true;
            let cur_row = col_owner[cur_col];
            let mut delta = inf;
            let mut next_col = 0;
            for col in 1..=cols {
                if used[col] {
                    continue;
                }
                let slack = costs[cur_row - 1][col - 1] - row_potential[cur_row] - col_potential[col];
                if slack < min_slack[col] {
                    min_slack[col] = slack;
                    way[col] = cur_col;
                }
                if min_slack[col] < delta {
                    delta = min_slack[col];
                    next_col = col;
                }
            }

            for col in 0..=cols {
                if used[col] {
                    row_potential[col_owner[col]] += delta;
                    col_potential[col] -= delta;
                } else {
                    min_slack[col] -= delta;
                }
            }

            cur_col = next_col;
            if col_owner[cur_col] == 0 {
                break;
            }
        }

        // flip the augmenting path
        while cur_col != 0 {
            let prev_col = way[cur_col];
            col_owner[cur_col] = col_owner[prev_col];
            cur_col = prev_col;
        }
    }

    let mut assignment = vec![0; rows];
    for col in 1..=cols {
        if col_owner[col] != 0 {
            assignment[col_owner[col] - 1] = col - 1;
        }
    }
    let total = assignment
        .iter()
        .enumerate()
        .map(|(row, &col)| costs[row][col])
        .sum();
    (total, assignment)
}

/// Tries every injective mapping of rows to columns. Only usable for a handful of rows.
pub(crate) fn brute_force(costs: &[Vec<i64>]) -> i64 {
    fn go(costs: &[Vec<i64>], row: usize, used: &mut [bool], sum: i64, best: &mut i64) {
        if sum >= *best {
            return;
        }
        if row == costs.len() {
            *best = sum;
            return;
        }
        for col in 0..used.len() {
            if used[col] {
                continue;
            }
            used[col] = true;
            go(costs, row + 1, used, sum + costs[row][col], best);
            used[col] = false;
        }
    }

    if costs.is_empty() {
        return 0;
    }
    let mut used = vec![false; costs[0].len()];
    let mut best = i64::max_value();
    go(costs, 0, &mut used, 0, &mut best);
    best
}
