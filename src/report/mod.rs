//! Run accounting: realized revenue, export-shaped records, and summaries.
//!
//! The simulation and the exact baseline both end in an order set with
//! final actions; this module turns either into flat per-order records
//! (the shape a CSV or dashboard consumes) and a four-number summary:
//! estimated total reward, realized revenue, claim cost, and net revenue.
//! Rendering itself is out of scope; records are plain data.

mod records;

pub use records::{
    order_records, plan_summary, planned_records, realized_revenue, summarize, OrderRecord,
    RunSummary,
};
