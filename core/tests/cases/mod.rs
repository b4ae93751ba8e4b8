mod determinism;
mod out_of_order;
mod policies;
