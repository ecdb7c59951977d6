// Integration tests harness
mod collecting {
    include!("collecting.rs");
}
mod aborting {
    include!("aborting.rs");
}
mod isolation {
    include!("isolation.rs");
}
