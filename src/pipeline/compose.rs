use crate::pipeline::transform::Transform;

/// Sequence transforms into a single transform, dropping disabled ones.
///
/// `None` entries are placeholders for stages the caller disabled; they are
/// filtered out here, once. The returned transform applies the remaining stages
/// left to right, each receiving the previous stage's output. The first failing
/// stage aborts the whole pipeline with [`RewireError::BrokenComposition`].
///
/// [`RewireError::BrokenComposition`]: crate::error::RewireError::BrokenComposition
pub fn compose<I>(stages: I) -> Transform
where
	I: IntoIterator<Item = Option<Transform>>,
{
	let stages: Vec<Transform> = stages.into_iter().flatten().collect();

	let name = format!(
		"override({})",
		stages
			.iter()
			.map(Transform::name)
			.collect::<Vec<_>>()
			.join(", ")
	);

	Transform::new(name, move |doc, ctx| {
		stages
			.iter()
			.try_fold(doc, |doc, stage| stage.apply_as_stage(doc, ctx))
	})
}
