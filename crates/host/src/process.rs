//! External search process execution.
//!
//! A spawned search command is represented by a [`SearchProcess`], which
//! splits into a [`ProcessControl`] (kill + termination watch, cheap to
//! clone) and a [`ProcessCompletion`] (awaited once for the captured
//! output). Termination is a typed outcome: a process that exits because
//! [`ProcessControl::request_termination`] was called resolves to
//! [`ProcessError::Terminated`], so callers never have to sniff error
//! text to tell a deliberate kill from a genuine failure.

use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;

/// Command line for one external search invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
	pub program: String,
	pub args: Vec<String>,
	pub cwd: Option<PathBuf>,
}

/// Captured result of a completed search process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
	pub stdout: String,
	pub stderr: String,
	pub exit_code: i32,
}

/// Failure modes of external search execution.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
	/// The command could not be started at all.
	#[error("failed to spawn {program}: {source}")]
	Spawn {
		program: String,
		#[source]
		source: io::Error,
	},
	/// The process exited because termination was requested.
	#[error("search process terminated")]
	Terminated,
	/// Waiting on or capturing from the process failed.
	#[error("search process io failure: {0}")]
	Io(#[from] io::Error),
}

/// Kill side of a running search process.
///
/// Held by whoever owns the process lifecycle; cloning shares the same
/// underlying process.
#[derive(Debug, Clone)]
pub struct ProcessControl {
	kill: CancellationToken,
	finished: CancellationToken,
}

impl ProcessControl {
	/// Requests termination. Idempotent; returns true when this call
	/// initiated the request.
	pub fn request_termination(&self) -> bool {
		if self.kill.is_cancelled() {
			return false;
		}
		self.kill.cancel();
		true
	}

	/// Resolves once the process has fully exited and been reaped,
	/// whether it completed, failed, or was terminated.
	pub async fn terminated(&self) {
		self.finished.cancelled().await;
	}
}

/// Completion side of a running search process. Awaited exactly once.
#[derive(Debug)]
pub struct ProcessCompletion {
	outcome: tokio::task::JoinHandle<Result<ProcessOutput, ProcessError>>,
}

impl ProcessCompletion {
	/// Resolves with the captured output, or the typed failure.
	pub async fn wait(self) -> Result<ProcessOutput, ProcessError> {
		match self.outcome.await {
			Ok(result) => result,
			Err(join) => Err(ProcessError::Io(io::Error::other(join))),
		}
	}
}

/// A cancellable, awaitable handle for one external search invocation.
#[derive(Debug)]
pub struct SearchProcess {
	control: ProcessControl,
	completion: ProcessCompletion,
}

impl SearchProcess {
	/// Builds a handle around an execution task.
	///
	/// The task receives the kill token and must resolve to
	/// [`ProcessError::Terminated`] when it exits because of it. The
	/// termination watch fires when the task finishes on any path.
	pub fn from_task<F, Fut>(task: F) -> Self
	where
		F: FnOnce(CancellationToken) -> Fut,
		Fut: Future<Output = Result<ProcessOutput, ProcessError>> + Send + 'static,
	{
		let kill = CancellationToken::new();
		let finished = CancellationToken::new();
		let fut = task(kill.clone());
		let guard = finished.clone().drop_guard();
		let outcome = tokio::spawn(async move {
			let _guard = guard;
			fut.await
		});
		Self {
			control: ProcessControl { kill, finished },
			completion: ProcessCompletion { outcome },
		}
	}

	/// Splits the handle into its kill and completion sides.
	pub fn split(self) -> (ProcessControl, ProcessCompletion) {
		(self.control, self.completion)
	}
}

/// Factory capability for launching search commands.
pub trait ProcessSpawner: Send + Sync {
	fn spawn(&self, spec: &CommandSpec) -> Result<SearchProcess, ProcessError>;
}

/// Production spawner backed by `tokio::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioProcessSpawner;

impl ProcessSpawner for TokioProcessSpawner {
	fn spawn(&self, spec: &CommandSpec) -> Result<SearchProcess, ProcessError> {
		let mut command = Command::new(&spec.program);
		command
			.args(&spec.args)
			.stdin(Stdio::null())
			.stdout(Stdio::piped())
			.stderr(Stdio::piped())
			.kill_on_drop(true);
		if let Some(cwd) = &spec.cwd {
			command.current_dir(cwd);
		}

		let child = command.spawn().map_err(|source| ProcessError::Spawn {
			program: spec.program.clone(),
			source,
		})?;
		tracing::trace!(program = %spec.program, "search process spawned");
		Ok(SearchProcess::from_task(move |kill| run_child(child, kill)))
	}
}

/// Closure-backed spawner adapter.
pub struct FnSpawner<F>(F);

impl<F> FnSpawner<F> {
	pub fn new(f: F) -> Self {
		Self(f)
	}
}

impl<F> ProcessSpawner for FnSpawner<F>
where
	F: Fn(&CommandSpec) -> Result<SearchProcess, ProcessError> + Send + Sync,
{
	fn spawn(&self, spec: &CommandSpec) -> Result<SearchProcess, ProcessError> {
		(self.0)(spec)
	}
}

enum ChildOutcome {
	Completed(Result<ProcessOutput, ProcessError>),
	Killed,
}

async fn run_child(mut child: Child, kill: CancellationToken) -> Result<ProcessOutput, ProcessError> {
	let stdout = child.stdout.take();
	let stderr = child.stderr.take();

	let outcome = tokio::select! {
		_ = kill.cancelled() => ChildOutcome::Killed,
		result = async {
			let (stdout, stderr) = tokio::join!(capture_lines(stdout), capture_lines(stderr));
			let status = child.wait().await?;
			Ok(ProcessOutput {
				stdout,
				stderr,
				exit_code: status.code().unwrap_or(-1),
			})
		} => ChildOutcome::Completed(result),
	};

	match outcome {
		ChildOutcome::Completed(result) => result,
		ChildOutcome::Killed => {
			let _ = child.start_kill();
			let _ = child.wait().await;
			Err(ProcessError::Terminated)
		}
	}
}

async fn capture_lines<R>(reader: Option<R>) -> String
where
	R: AsyncRead + Unpin,
{
	let Some(reader) = reader else {
		return String::new();
	};
	let mut lines = BufReader::new(reader).lines();
	let mut output = String::new();
	while let Ok(Some(line)) = lines.next_line().await {
		output.push_str(&line);
		output.push('\n');
	}
	output
}
