use super::*;
use std::cell::Cell;
use std::rc::Rc;

#[test]
fn test_immediate_runs_synchronously() {
    let ran = Rc::new(Cell::new(false));
    let flag = ran.clone();
    Immediate.schedule(Box::new(move || flag.set(true)));
    assert!(ran.get());
}
