use drawkit_designer::history::{Command, History};
use proptest::prelude::*;

/// Appends its value to a log; undo pops it back off.
#[derive(Debug, Clone)]
struct Push(u32);

impl Command<Vec<u32>> for Push {
    type Error = String;

    fn execute(&mut self, target: &mut Vec<u32>) -> Result<(), String> {
        target.push(self.0);
        Ok(())
    }

    fn undo(&mut self, target: &mut Vec<u32>) -> Result<(), String> {
        match target.pop() {
            Some(v) if v == self.0 => Ok(()),
            other => Err(format!("expected {} on top, found {:?}", self.0, other)),
        }
    }

    fn name(&self) -> &str {
        "Push"
    }
}

/// Fails to undo, to check that the cursor stays put.
#[derive(Debug)]
struct Stuck;

impl Command<Vec<u32>> for Stuck {
    type Error = String;

    fn execute(&mut self, _: &mut Vec<u32>) -> Result<(), String> {
        Ok(())
    }

    fn undo(&mut self, _: &mut Vec<u32>) -> Result<(), String> {
        Err("stuck".to_string())
    }

    fn name(&self) -> &str {
        "Stuck"
    }
}

#[derive(Debug, Clone)]
enum Op {
    Register(u32),
    Undo,
    Redo,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u32..1000).prop_map(Op::Register),
        Just(Op::Undo),
        Just(Op::Redo),
    ]
}

#[test]
fn test_default_capacity_is_fifty() {
    let history: History<Push, Vec<u32>> = History::default();
    assert_eq!(history.capacity(), 50);
}

#[test]
fn test_failed_undo_keeps_cursor() {
    let mut history: History<Stuck, Vec<u32>> = History::new(5);
    let mut log = Vec::new();
    history.register(Stuck);
    assert!(history.undo(&mut log).is_err());
    assert_eq!(history.index(), 1);
    assert!(history.can_undo());
}

#[test]
fn test_eviction_keeps_newest_fifty() {
    let mut history: History<Push, Vec<u32>> = History::default();
    let mut log = Vec::new();
    for v in 0..60 {
        log.push(v);
        history.register(Push(v));
    }
    assert_eq!(history.len(), 50);
    let mut undone = 0;
    while history.undo(&mut log).unwrap() {
        undone += 1;
    }
    assert_eq!(undone, 50);
    assert_eq!(log, (0..10).collect::<Vec<_>>());
}

proptest! {
    /// The applied commands always form the tail of the target, and the
    /// cursor never leaves `0..=len`.
    #[test]
    fn prop_history_stays_linear(ops in proptest::collection::vec(op(), 0..80), capacity in 1usize..8) {
        let mut history: History<Push, Vec<u32>> = History::new(capacity);
        let mut log: Vec<u32> = Vec::new();

        for op in ops {
            match op {
                Op::Register(v) => {
                    log.push(v);
                    history.register(Push(v));
                }
                Op::Undo => {
                    let could = history.can_undo();
                    prop_assert_eq!(history.undo(&mut log).unwrap(), could);
                }
                Op::Redo => {
                    let could = history.can_redo();
                    prop_assert_eq!(history.redo(&mut log).unwrap(), could);
                }
            }
            prop_assert!(history.len() <= capacity);
            prop_assert!(history.index() <= history.len());
            let applied: Vec<u32> = history.commands().take(history.index()).map(|c| c.0).collect();
            prop_assert!(log.ends_with(&applied));
        }
    }

    /// Registering after undos drops the redo branch.
    #[test]
    fn prop_register_truncates(values in proptest::collection::vec(0u32..100, 1..10), undos in 0usize..10) {
        let mut history: History<Push, Vec<u32>> = History::new(20);
        let mut log = Vec::new();
        for v in &values {
            log.push(*v);
            history.register(Push(*v));
        }
        let undos = undos.min(values.len());
        for _ in 0..undos {
            history.undo(&mut log).unwrap();
        }
        log.push(7);
        history.register(Push(7));
        prop_assert!(!history.can_redo());
        prop_assert_eq!(history.len(), values.len() - undos + 1);
        prop_assert_eq!(history.redo_description(), None);
    }
}
