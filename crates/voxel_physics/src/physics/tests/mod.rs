//! Scenario tests running the whole tick pipeline
