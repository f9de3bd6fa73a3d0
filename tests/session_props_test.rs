//! Property tests for session invariants over random input sequences.

use proptest::prelude::*;

use costlens::chat::{Flow, Role, SessionController};
use costlens::error::CostlensError;
use costlens::test_utils::{MockEndpoint, ScriptedInput, make_test_params};

#[derive(Debug, Clone)]
enum Step {
    Success {
        cost: Option<f64>,
        tokens: Option<u64>,
    },
    Failure,
    Clear,
    Local(&'static str),
    Blank,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => (
            proptest::option::of(0.0f64..1.0),
            proptest::option::of(0u64..5_000)
        )
            .prop_map(|(cost, tokens)| Step::Success { cost, tokens }),
        2 => Just(Step::Failure),
        1 => Just(Step::Clear),
        2 => prop::sample::select(vec!["help", "history", "stats", "HELP", " Stats "])
            .prop_map(Step::Local),
        1 => prop::sample::select(vec!["", "   ", "\t"]).prop_map(|_| Step::Blank),
    ]
}

impl Step {
    fn line(&self, i: usize) -> String {
        match self {
            Self::Success { .. } | Self::Failure => format!("message {i}"),
            Self::Clear => "clear".to_string(),
            Self::Local(command) => (*command).to_string(),
            Self::Blank => "  ".to_string(),
        }
    }
}

/// Expected transcript length and totals, tracked alongside the real run.
#[derive(Default)]
struct Model {
    len: usize,
    cost: f64,
    tokens: u64,
    calls: usize,
}

impl Model {
    fn apply(&mut self, step: &Step) {
        match step {
            Step::Success { cost, tokens } => {
                self.len += 2;
                self.cost += cost.unwrap_or(0.0);
                self.tokens += tokens.unwrap_or(0);
                self.calls += 1;
            }
            Step::Failure => {
                self.len += 1;
                self.calls += 1;
            }
            Step::Clear => {
                self.len = 1;
                self.cost = 0.0;
                self.tokens = 0;
            }
            Step::Local(_) | Step::Blank => {}
        }
    }
}

fn script(endpoint: &MockEndpoint, steps: &[Step]) {
    for (i, step) in steps.iter().enumerate() {
        match step {
            Step::Success { cost, tokens } => {
                endpoint.push_reply(&format!("reply {i}"), *cost, *tokens);
            }
            Step::Failure => endpoint.push_error(CostlensError::Api {
                status: Some(500),
                message: "boom".to_string(),
            }),
            _ => {}
        }
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime")
}

fn run(steps: &[Step]) -> (costlens::chat::SessionOutcome<Vec<u8>>, MockEndpoint, Model) {
    let endpoint = MockEndpoint::new();
    script(&endpoint, steps);
    let mut model = Model {
        len: 1,
        ..Model::default()
    };
    let lines: Vec<String> = steps.iter().enumerate().map(|(i, s)| s.line(i)).collect();
    for step in steps {
        model.apply(step);
    }

    let script: Vec<&str> = lines.iter().map(String::as_str).collect();
    let controller = SessionController::new(
        make_test_params(),
        endpoint.clone(),
        ScriptedInput::new(&script),
        Vec::new(),
    );
    let outcome = runtime().block_on(controller.run());
    (outcome, endpoint, model)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn system_message_leads_after_every_step(steps in prop::collection::vec(step(), 0..24)) {
        let endpoint = MockEndpoint::new();
        script(&endpoint, &steps);
        let mut controller = SessionController::new(
            make_test_params(),
            endpoint.clone(),
            ScriptedInput::new(&[]),
            Vec::new(),
        );
        let runtime = runtime();

        for (i, step) in steps.iter().enumerate() {
            let before = controller.state().len();
            let flow = runtime.block_on(controller.handle_line(&step.line(i)));
            prop_assert_eq!(flow.ok(), Some(Flow::Continue));

            let transcript = controller.state().transcript();
            prop_assert_eq!(transcript[0].role, Role::System);
            prop_assert_eq!(
                transcript.iter().filter(|m| m.role == Role::System).count(),
                1
            );
            let expected = match step {
                Step::Success { .. } => before + 2,
                Step::Failure => before + 1,
                Step::Clear => 1,
                Step::Local(_) | Step::Blank => before,
            };
            prop_assert_eq!(transcript.len(), expected);
        }
    }

    #[test]
    fn transcript_matches_model(steps in prop::collection::vec(step(), 0..24)) {
        let (outcome, endpoint, model) = run(&steps);
        let transcript = outcome.state.transcript();

        prop_assert_eq!(transcript.len(), model.len);
        prop_assert_eq!(transcript[0].role, Role::System);
        prop_assert_eq!(endpoint.call_count(), model.calls);
    }

    #[test]
    fn stats_total_cost_is_sum_of_assistant_costs(steps in prop::collection::vec(step(), 0..24)) {
        let (outcome, _, model) = run(&steps);
        let stats = outcome.state.stats();

        let summed: f64 = outcome
            .state
            .transcript()
            .iter()
            .filter(|m| m.role == Role::Assistant)
            .filter_map(|m| m.cost)
            .sum();
        prop_assert!((stats.total_cost - summed).abs() < 1e-9);
        prop_assert!((stats.total_cost - model.cost).abs() < 1e-9);
        prop_assert_eq!(stats.total_tokens, model.tokens);
        prop_assert_eq!(outcome.summary.messages, model.len - 1);
    }
}
