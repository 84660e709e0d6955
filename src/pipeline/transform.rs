use crate::context::{Gate, RunContext};
use crate::document::Document;
use crate::error::{Result, RewireError};
use std::fmt;
use std::sync::Arc;

type TransformFn = dyn Fn(Document, &RunContext) -> Result<Document> + Send + Sync;

/// A named unit of mutation over a [`Document`].
///
/// A transform consumes the document it is given and returns the document for
/// the next stage. The [`RunContext`] is supplied when the transform is
/// applied, never when it is built.
#[derive(Clone)]
pub struct Transform {
	name: String,
	apply: Arc<TransformFn>,
}

impl Transform {
	pub fn new<F>(name: impl Into<String>, apply: F) -> Self
	where
		F: Fn(Document, &RunContext) -> Result<Document> + Send + Sync + 'static,
	{
		Transform {
			name: name.into(),
			apply: Arc::new(apply),
		}
	}

	/// A transform that mutates the document in place and ignores the context.
	pub fn mutate<F>(name: impl Into<String>, mutate: F) -> Self
	where
		F: Fn(&mut Document) -> Result<()> + Send + Sync + 'static,
	{
		Transform::new(name, move |mut doc, _| {
			mutate(&mut doc)?;
			Ok(doc)
		})
	}

	/// Pass the document through unchanged.
	pub fn identity() -> Self {
		Transform::new("identity", |doc, _| Ok(doc))
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn apply(&self, doc: Document, ctx: &RunContext) -> Result<Document> {
		(self.apply)(doc, ctx)
	}

	/// Only run this transform when `gate` holds at apply time.
	pub fn gated(self, gate: Gate) -> Self {
		if gate == Gate::Always {
			return self;
		}

		let name = format!("{} when {}", self.name, gate);
		Transform::new(name, move |doc, ctx| {
			if gate.evaluate(ctx) {
				self.apply(doc, ctx)
			} else {
				tracing::debug!(stage = %self.name, %gate, "gate closed, skipping");
				Ok(doc)
			}
		})
	}

	/// Wrap a failure of this transform with its name.
	pub(crate) fn apply_as_stage(&self, doc: Document, ctx: &RunContext) -> Result<Document> {
		tracing::debug!(stage = %self.name, "applying");
		self.apply(doc, ctx)
			.map_err(|source| RewireError::BrokenComposition {
				stage: self.name.clone(),
				source: Box::new(source),
			})
	}
}

impl fmt::Debug for Transform {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Transform").field("name", &self.name).finish()
	}
}

/// Collect a group of transforms, e.g. one per babel plugin, into stages.
pub fn stages<I>(transforms: I) -> impl Iterator<Item = Option<Transform>>
where
	I: IntoIterator<Item = Transform>,
{
	transforms.into_iter().map(Some)
}
