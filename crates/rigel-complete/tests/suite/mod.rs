mod constructor_flow;
mod conversions;
mod soundness;
