//! Test-only helpers for scripting git invocations on a mock executor.

use mockall::Sequence;

use crate::exec::CommandError;
use crate::exec::CommandOutput;
use crate::exec::MockExecutor;

/// Expect exactly one `git <args>` invocation, in sequence, returning `result`.
pub fn expect_git(
    mock: &mut MockExecutor,
    seq: &mut Sequence,
    args: &[&str],
    result: Result<CommandOutput, CommandError>,
) {
    let expected: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    mock.expect_run()
        .withf(move |invocation, _| invocation.program == "git" && invocation.args == expected)
        .times(1)
        .in_sequence(seq)
        .return_once(move |_, _| result);
}

/// A successful invocation printing `stdout`.
pub fn ok(stdout: &str) -> Result<CommandOutput, CommandError> {
    Ok(CommandOutput::from_stdout(stdout))
}

/// A non-zero exit with `output` as the combined output.
pub fn failed(output: &str) -> Result<CommandOutput, CommandError> {
    Err(CommandError::Failed {
        command: "git".to_string(),
        code: Some(1),
        output: output.to_string(),
    })
}
