mod time_limited_solver;

pub use time_limited_solver::TimeLimitedSolver;
