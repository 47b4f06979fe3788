use super::helpers::build_deposit_for_index;
use crate::GeneratorContext;
use anyhow::{anyhow, ensure, Context};
use chain::{ChainConfig, PresetBase};
use containers::{BlockProcessingError, Bytes32, Deposit, DepositProof, State};
use edge_case::{
    execute, register, CaseEntry, Operation, OperationError, Suite, SuiteOutput,
};
use std::sync::Arc;
use tracing::{debug, info};

pub const DEPOSIT_INPUT_TYPE: &str = "Deposit";

const INITIAL_VALIDATOR_COUNT: u64 = 10;

pub type DepositCase = CaseEntry<State, Deposit, BlockProcessingError>;

/// `State::process_deposit` with deposit rejections reported as
/// [`OperationError::Rejected`] and every other failure as a fault.
pub fn process_deposit_operation(
    config: ChainConfig,
) -> Operation<State, Deposit, BlockProcessingError> {
    Arc::new(move |state, deposit| {
        state.process_deposit(deposit, &config).map_err(|error| {
            if error.is_invalid_operation() {
                OperationError::Rejected(error)
            } else {
                OperationError::Fault(error)
            }
        })
    })
}

fn deposit_case(
    ctx: &Arc<GeneratorContext>,
    description: &str,
    expect_error: bool,
    index: u64,
    corrupt: fn(&mut State, &mut Deposit) -> anyhow::Result<()>,
) -> DepositCase {
    let operation = process_deposit_operation(ctx.config.clone());
    let ctx = Arc::clone(ctx);

    register(description, DEPOSIT_INPUT_TYPE, operation, expect_error).wrap(move || {
        let (mut deposit, mut state) =
            build_deposit_for_index(&ctx, INITIAL_VALIDATOR_COUNT, index)?;
        corrupt(&mut state, &mut deposit)?;
        Ok((state, deposit))
    })
}

pub fn valid_deposit(ctx: &Arc<GeneratorContext>) -> DepositCase {
    deposit_case(ctx, "valid deposit to add new validator", false, 10, |_, _| Ok(()))
}

pub fn valid_topup(ctx: &Arc<GeneratorContext>) -> DepositCase {
    deposit_case(ctx, "valid deposit to top-up existing validator", false, 3, |_, _| Ok(()))
}

pub fn invalid_deposit_index(ctx: &Arc<GeneratorContext>) -> DepositCase {
    deposit_case(ctx, "invalid deposit index", true, 10, |state, _| {
        // one below the deposit's index
        state.deposit_index = 9;
        Ok(())
    })
}

pub fn invalid_deposit_proof(ctx: &Arc<GeneratorContext>) -> DepositCase {
    deposit_case(ctx, "invalid deposit proof", true, 10, |_, deposit| {
        let mut branch: Vec<Bytes32> = deposit.proof.iter().copied().collect();
        if let Some(last) = branch.last_mut() {
            *last = Bytes32::zero();
        }
        deposit.proof = DepositProof::try_from_iter(branch)
            .map_err(|e| anyhow!("Failed to rebuild proof: {e:?}"))?;
        Ok(())
    })
}

/// A new validator with a bad proof of possession is skipped, not rejected:
/// the deposit index advances and the registry stays as it was.
pub fn invalid_deposit_signature(ctx: &Arc<GeneratorContext>) -> DepositCase {
    deposit_case(
        ctx,
        "deposit with invalid signature is skipped",
        false,
        10,
        |_, deposit| {
            deposit.data.signature.inner[0] ^= 0xff;
            Ok(())
        },
    )
}

pub fn deposit_cases(ctx: &Arc<GeneratorContext>) -> Vec<DepositCase> {
    vec![
        valid_deposit(ctx),
        valid_topup(ctx),
        invalid_deposit_index(ctx),
        invalid_deposit_proof(ctx),
        invalid_deposit_signature(ctx),
    ]
}

fn deposits_suite(
    ctx: &Arc<GeneratorContext>,
    name: &str,
    preset: PresetBase,
    forks_timeline: &str,
) -> anyhow::Result<SuiteOutput> {
    ensure!(
        ctx.config.preset_base == preset,
        "Suite {name} needs the {preset} preset, got {}",
        ctx.config.preset_base
    );

    let test_cases = deposit_cases(ctx)
        .iter()
        .map(|entry| {
            let case = entry
                .build()
                .with_context(|| format!("Failed to build case '{}'", entry.description()))?;
            let record = execute(case)?;
            debug!(case = %record.case_name, expect_error = record.expects_error(), "Executed case");
            Ok(record)
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    info!(suite = name, cases = test_cases.len(), "Generated deposit suite");

    Ok(SuiteOutput {
        name: name.to_owned(),
        directory: "deposits".to_owned(),
        suite: Suite {
            title: "deposit operation".to_owned(),
            summary: "Test suite for deposit type operation processing".to_owned(),
            forks_timeline: forks_timeline.to_owned(),
            forks: vec!["phase0".to_owned()],
            config: preset.as_str().to_owned(),
            runner: "operations".to_owned(),
            handler: "deposits".to_owned(),
            test_cases,
        },
    })
}

pub fn mini_deposits_suite(ctx: &Arc<GeneratorContext>) -> anyhow::Result<SuiteOutput> {
    deposits_suite(ctx, "deposit_minimal", PresetBase::Minimal, "testing")
}

pub fn full_deposits_suite(ctx: &Arc<GeneratorContext>) -> anyhow::Result<SuiteOutput> {
    deposits_suite(ctx, "deposit_full", PresetBase::Mainnet, "mainnet")
}
