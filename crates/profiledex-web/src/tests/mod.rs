mod harness;
mod profiles;
