//! `morel` — a smoke-test harness for `morel-core`.
//!
//! There is no parser in this workspace, so this binary has nothing to
//! read from the command line. Instead it builds a handful of `Code`
//! trees by hand, the same way an external compiler would, and drives
//! each through the core — one for a handful of representative end-to-end
//! scenarios, plus a session/property round-trip. Each scenario prints its
//! result or its uncaught exception message.

use std::{cell::RefCell, process::ExitCode, rc::Rc};

use morel_core::{
    BuiltInExn, Clause, Closure, Code, EvalEnv, Pos, RunResult, Session, Value,
    applicable::{Applicable, Applicable1},
    builtins,
    code::{ApplyDynamic, Constant, Get, GetMulti, MakeClosure, TupleConstruct},
    pattern::{Literal, Pattern},
    sink::{
        FromCode, OrdinalSlot, RowSink,
        collect::CollectSink,
        group::{Aggregate, GroupSink},
        scan::ScanSink,
        setop::{Kind, SetOpSink},
    },
};

fn root_env() -> EvalEnv {
    EvalEnv::root(builtins::registry())
}

fn builtin(env: &EvalEnv, name: &str) -> Rc<dyn Applicable> {
    match env.get_opt(name).unwrap_or_else(|| panic!("missing built-in '{name}'")) {
        Value::Applicable(a) => a,
        other => panic!("'{name}' is not an Applicable: {other:?}"),
    }
}

/// `(fn (x, y) => x + y) (3, 4)`.
fn scenario_sum_of_pair() -> RunResult<Value> {
    let env = root_env();
    let add = builtin(&env, "Int.+");
    let body: Rc<dyn Code> = Rc::new(ApplyDynamic {
        func: Rc::new(ApplyDynamic { func: Rc::new(Constant(Value::Applicable(add))), arg: Rc::new(Get(Rc::from("x"))) }),
        arg: Rc::new(Get(Rc::from("y"))),
    });
    let closure = MakeClosure {
        clauses: vec![(Pattern::Tuple(vec![Pattern::Ident(Rc::from("x")), Pattern::Ident(Rc::from("y"))]), body)],
        pos: Pos::synthetic(),
    };
    let apply = ApplyDynamic {
        func: Rc::new(closure),
        arg: Rc::new(TupleConstruct(vec![Rc::new(Constant(Value::Int(3))), Rc::new(Constant(Value::Int(4)))])),
    };
    apply.eval(&env)
}

/// `let val f = fn x => case x of 0 => "zero" | _ => "nonzero" in f 0 ^
/// "/" ^ f 5 end`.
fn scenario_case_clauses() -> RunResult<Value> {
    let env = root_env();
    let clauses = vec![
        Clause { pat: Pattern::Literal(Literal::Int(0)), body: Rc::new(Constant(Value::Str(Rc::from("zero")))) },
        Clause { pat: Pattern::Wildcard, body: Rc::new(Constant(Value::Str(Rc::from("nonzero")))) },
    ];
    let f = Closure::new(env.clone(), clauses, Pos::synthetic());
    let left = f.apply(&Value::Int(0))?;
    let right = f.apply(&Value::Int(5))?;
    let concat = builtin(&env, "String.concat");
    concat.apply(&Value::seq(vec![left, Value::Str(Rc::from("/")), right]))
}

/// `from e in [{a=1,b=2}, {a=1,b=3}, {a=2,b=5}] group a compute s = sum of
/// b`. Records are modeled as `(a, b)` pairs; the
/// aggregate reuses the real `Relational.sum` built-in.
fn scenario_group_and_sum() -> RunResult<Value> {
    let env = root_env();
    let sum_fn = builtin(&env, "Relational.sum");
    let rows = Value::seq(
        [(1, 2), (1, 3), (2, 5)]
            .into_iter()
            .map(|(a, b)| Value::seq(vec![Value::Int(a), Value::Int(b)]))
            .collect(),
    );
    let build = move || -> Box<dyn RowSink> {
        let collect = CollectSink::new(Rc::new(GetMulti(vec![Rc::from("a"), Rc::from("s")])));
        let group = GroupSink::new(
            vec![Rc::from("a")],
            Rc::new(Get(Rc::from("a"))),
            vec![Rc::from("a"), Rc::from("b")],
            vec![Aggregate { name: Rc::from("s"), project: Rc::new(Get(Rc::from("b"))), function: sum_fn.clone() }],
            Box::new(collect),
        );
        let scan = ScanSink {
            pat: Pattern::Tuple(vec![Pattern::Ident(Rc::from("a")), Pattern::Ident(Rc::from("b"))]),
            source: Rc::new(Constant(rows.clone())),
            condition: None,
            ordinal: OrdinalSlot::new(),
            downstream: Box::new(group),
        };
        Box::new(scan)
    };
    FromCode { build: Box::new(build) }.eval(&env)
}

/// `[1,2,3] union distinct [2,3,4]`.
fn scenario_union_distinct() -> RunResult<Value> {
    set_op_scenario(Kind::UnionDistinct, &[1, 2, 3], &[2, 3, 4])
}

/// `[1,1,2,3] intersect all [1,1,1,3]`.
fn scenario_intersect_all() -> RunResult<Value> {
    set_op_scenario(Kind::IntersectAll, &[1, 1, 2, 3], &[1, 1, 1, 3])
}

fn set_op_scenario(kind: Kind, left: &[i64], right: &[i64]) -> RunResult<Value> {
    let env = root_env();
    let left = Value::seq(left.iter().map(|&i| Value::Int(i)).collect());
    let right: Rc<dyn Code> = Rc::new(Constant(Value::seq(right.iter().map(|&i| Value::Int(i)).collect())));
    let build = move || -> Box<dyn RowSink> {
        let collect = CollectSink::new(Rc::new(Get(Rc::from("e"))));
        let setop = SetOpSink::new(kind, vec![Rc::from("e")], vec![right.clone()], Box::new(collect));
        let scan = ScanSink {
            pat: Pattern::Ident(Rc::from("e")),
            source: Rc::new(Constant(left.clone())),
            condition: None,
            ordinal: OrdinalSlot::new(),
            downstream: Box::new(setop),
        };
        Box::new(scan)
    };
    FromCode { build: Box::new(build) }.eval(&env)
}

/// `hd []` — always raises `Empty`.
fn scenario_hd_of_empty() -> RunResult<Value> {
    let hd = builtins::list::Hd { pos: Pos::new(1, 1) };
    hd.apply1(&Value::seq(vec![]))
}

/// `Sys.set ("lineWidth", 120); Sys.get "lineWidth"` — exercises the
/// session surface alongside the evaluator core.
fn scenario_session_round_trip() -> RunResult<Value> {
    let session = Rc::new(RefCell::new(Session::new()));
    let env = EvalEnv::root(builtins::registry_with_session(session));
    let set = builtin(&env, "Sys.set");
    let get = builtin(&env, "Sys.get");
    let Value::Applicable(set_stage2) = set.apply(&Value::Str(Rc::from("lineWidth")))? else {
        unreachable!("Sys.set is curried")
    };
    set_stage2.apply(&Value::Int(120))?;
    get.apply(&Value::Str(Rc::from("lineWidth")))
}

/// Prints the scenario's outcome; returns whether it matched expectations
/// (every scenario but `hd_of_empty` should succeed, which is expected to
/// raise `Empty`).
fn run_and_report(name: &str, result: RunResult<Value>) -> bool {
    match result {
        Ok(value) => {
            println!("{name}: {value:?}");
            true
        }
        Err(err) => {
            println!("{name}: {}", err.uncaught_message());
            err.kind == BuiltInExn::Empty
        }
    }
}

fn main() -> ExitCode {
    let scenarios: Vec<(&str, fn() -> RunResult<Value>)> = vec![
        ("sum_of_pair", scenario_sum_of_pair),
        ("case_clauses", scenario_case_clauses),
        ("group_and_sum", scenario_group_and_sum),
        ("union_distinct", scenario_union_distinct),
        ("intersect_all", scenario_intersect_all),
        ("hd_of_empty", scenario_hd_of_empty),
        ("session_round_trip", scenario_session_round_trip),
    ];

    let mut ok = true;
    for (name, scenario) in scenarios {
        if !run_and_report(name, scenario()) {
            ok = false;
        }
    }
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
