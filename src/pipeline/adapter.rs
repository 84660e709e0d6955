use crate::context::RunContext;
use crate::document::Document;
use crate::error::Result;
use crate::pipeline::transform::Transform;

/// Post-process the output of a two-argument configuration factory.
///
/// The returned factory takes the same arguments in the same order, calls
/// `factory` with them, and pipes the produced document through `transform`.
/// `context` is called on every invocation, so gates see the context of that
/// invocation rather than the one present when the factory was wrapped.
pub fn override_dev_server<A, B, F, C>(
	transform: Transform,
	context: C,
	factory: F,
) -> impl Fn(A, B) -> Result<Document>
where
	F: Fn(A, B) -> Result<Document>,
	C: Fn() -> RunContext,
{
	move |first, second| {
		let doc = factory(first, second)?;
		transform.apply(doc, &context())
	}
}

/// [`override_dev_server`] reading the context from the current process.
pub fn override_dev_server_from_process<A, B, F>(
	transform: Transform,
	factory: F,
) -> impl Fn(A, B) -> Result<Document>
where
	F: Fn(A, B) -> Result<Document>,
{
	override_dev_server(transform, RunContext::from_process, factory)
}
