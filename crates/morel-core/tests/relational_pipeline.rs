//! End-to-end coverage of a `from`-style relational pipeline assembled
//! from several chained `RowSink`s, driven the way a compiled query
//! would drive it through `FromCode`, rather than exercising each sink
//! in isolation the way the colocated unit tests do.

use std::rc::Rc;

use morel_core::{
    EvalEnv, Pattern, RunResult, Value,
    builtins,
    code::{Code, Constant, Get},
    comparator::ComparatorBuilder,
    sink::{
        FromCode, OrdinalSlot, RowSink,
        collect::CollectSink,
        group::{Aggregate, GroupSink},
        order::OrderSink,
        scan::ScanSink,
        setop::{Kind, SetOpSink},
        where_::WhereSink,
        yield_::YieldSink,
    },
    type_descriptor::{TypeDescriptor, TypeKey},
};

fn root_env() -> EvalEnv {
    EvalEnv::root(builtins::registry())
}

fn ints(xs: &[i64]) -> Value {
    Value::seq(xs.iter().map(|&i| Value::Int(i)).collect())
}

fn as_ints(v: &Value) -> Vec<i64> {
    v.as_seq().unwrap().iter().map(|e| e.as_int().unwrap()).collect()
}

fn builtin(env: &EvalEnv, name: &str) -> Rc<dyn morel_core::Applicable> {
    match env.get_opt(name).unwrap_or_else(|| panic!("missing built-in '{name}'")) {
        Value::Applicable(a) => a,
        other => panic!("'{name}' is not an Applicable: {other:?}"),
    }
}

/// `from e in [1,2,3,4,5,6] where e mod 2 = 0 yield e * 10 order e descending`
fn where_then_yield_then_order() -> RunResult<Value> {
    let env = root_env();
    let source = ints(&[1, 2, 3, 4, 5, 6]);

    let build = move || -> Box<dyn RowSink> {
        let collect = CollectSink::new(Rc::new(Get(Rc::from("scaled"))));
        let mut builder = ComparatorBuilder::new();
        let int_ty = TypeDescriptor::Id { key: TypeKey(1), name: Rc::from("int") };
        let cmp = builder.build(&int_ty);
        let descending_cmp: morel_core::comparator::Comparator = Rc::new(move |a, b| cmp(b, a));
        let order = OrderSink::new(vec![Rc::from("scaled")], Rc::new(Get(Rc::from("scaled"))), descending_cmp, Box::new(collect));
        let yield_ = YieldSink {
            names: vec![Rc::from("scaled")],
            exprs: vec![Rc::new(double_expr())],
            downstream: Box::new(order),
        };
        let where_ = WhereSink { condition: Rc::new(even_condition()), downstream: Box::new(yield_) };
        let scan = ScanSink {
            pat: Pattern::Ident(Rc::from("e")),
            source: Rc::new(Constant(source.clone())),
            condition: None,
            ordinal: OrdinalSlot::new(),
            downstream: Box::new(where_),
        };
        Box::new(scan)
    };
    FromCode { build: Box::new(build) }.eval(&env)
}

fn double_expr() -> impl Code {
    struct Double;
    impl Code for Double {
        fn eval(&self, env: &EvalEnv) -> RunResult<Value> {
            let e = env.get_opt("e").expect("e bound by the enclosing scan");
            Ok(Value::Int(e.as_int().unwrap() * 10))
        }
        fn describe(&self, d: &mut morel_core::describer::Describer) {
            d.start("double_e", |_d| {});
        }
    }
    Double
}

fn even_condition() -> impl Code {
    struct IsEven;
    impl Code for IsEven {
        fn eval(&self, env: &EvalEnv) -> RunResult<Value> {
            let e = env.get_opt("e").expect("e bound by the enclosing scan");
            Ok(Value::Bool(e.as_int().unwrap() % 2 == 0))
        }
        fn describe(&self, d: &mut morel_core::describer::Describer) {
            d.start("is_even", |_d| {});
        }
    }
    IsEven
}

#[test]
fn where_yield_order_chain_filters_transforms_and_sorts_descending() {
    let result = where_then_yield_then_order().unwrap();
    assert_eq!(as_ints(&result), vec![60, 40, 20]);
}

/// `from (a, b) in rows group a compute total = sum of b, n = count`
/// (two aggregates over the same grouping, unlike the single-aggregate
/// smoke test in `morel-cli`).
#[test]
fn group_computes_multiple_aggregates_per_bucket() {
    let env = root_env();
    let sum_fn = builtin(&env, "Relational.sum");
    let count_fn = builtin(&env, "Relational.count");
    let rows = Value::seq(
        [(1, 2), (1, 3), (2, 5), (2, 7), (2, 11)]
            .into_iter()
            .map(|(a, b)| Value::seq(vec![Value::Int(a), Value::Int(b)]))
            .collect(),
    );
    let build = move || -> Box<dyn RowSink> {
        let collect = CollectSink::new(Rc::new(morel_core::code::GetMulti(vec![Rc::from("a"), Rc::from("total"), Rc::from("n")])));
        let group = GroupSink::new(
            vec![Rc::from("a")],
            Rc::new(Get(Rc::from("a"))),
            vec![Rc::from("a"), Rc::from("b")],
            vec![
                Aggregate { name: Rc::from("total"), project: Rc::new(Get(Rc::from("b"))), function: sum_fn.clone() },
                Aggregate { name: Rc::from("n"), project: Rc::new(Get(Rc::from("b"))), function: count_fn.clone() },
            ],
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
    let result = FromCode { build: Box::new(build) }.eval(&env).unwrap();
    let rows = result.as_seq().unwrap();
    assert_eq!(rows.len(), 2);
    let bucket_a = rows[0].as_seq().unwrap();
    assert_eq!(bucket_a[0].as_int(), Some(1));
    assert_eq!(bucket_a[1].as_int(), Some(5));
    assert_eq!(bucket_a[2].as_int(), Some(2));
    let bucket_b = rows[1].as_seq().unwrap();
    assert_eq!(bucket_b[0].as_int(), Some(2));
    assert_eq!(bucket_b[1].as_int(), Some(23));
    assert_eq!(bucket_b[2].as_int(), Some(3));
}

/// `[1,2,3] except distinct [2]` followed by `[1,2,2,3] intersect distinct
/// [2,2,4]` — two `SetOpSink` kinds the `morel-cli` harness doesn't cover.
#[test]
fn except_distinct_removes_matching_elements() {
    let env = root_env();
    let left = ints(&[1, 2, 3]);
    let right: Rc<dyn Code> = Rc::new(Constant(ints(&[2])));
    let build = move || -> Box<dyn RowSink> {
        let collect = CollectSink::new(Rc::new(Get(Rc::from("e"))));
        let setop = SetOpSink::new(Kind::ExceptDistinct, vec![Rc::from("e")], vec![right.clone()], Box::new(collect));
        let scan = ScanSink {
            pat: Pattern::Ident(Rc::from("e")),
            source: Rc::new(Constant(left.clone())),
            condition: None,
            ordinal: OrdinalSlot::new(),
            downstream: Box::new(setop),
        };
        Box::new(scan)
    };
    let result = FromCode { build: Box::new(build) }.eval(&env).unwrap();
    assert_eq!(as_ints(&result), vec![1, 3]);
}

#[test]
fn intersect_distinct_counts_each_common_element_once() {
    let env = root_env();
    let left = ints(&[1, 2, 2, 3]);
    let right: Rc<dyn Code> = Rc::new(Constant(ints(&[2, 2, 4])));
    let build = move || -> Box<dyn RowSink> {
        let collect = CollectSink::new(Rc::new(Get(Rc::from("e"))));
        let setop = SetOpSink::new(Kind::IntersectDistinct, vec![Rc::from("e")], vec![right.clone()], Box::new(collect));
        let scan = ScanSink {
            pat: Pattern::Ident(Rc::from("e")),
            source: Rc::new(Constant(left.clone())),
            condition: None,
            ordinal: OrdinalSlot::new(),
            downstream: Box::new(setop),
        };
        Box::new(scan)
    };
    let result = FromCode { build: Box::new(build) }.eval(&env).unwrap();
    assert_eq!(as_ints(&result), vec![2]);
}
