use anyhow::{Result, anyhow};
use plugin_registry::concrete::equality::compare_keyed;
use plugin_registry::{
    AbstractAlgorithm, AbstractType, CapabilitySet, ConcreteAlgorithm, ConcreteParamType,
    ConcreteType, ParamType, PropertyMap, PropertyRequest, Representation, Tolerance,
    TypeDeclaration, TypeModel,
};
use plugin_registry::plugin::Implementation;
use std::any::Any;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Ordered list of integers; stands in for any plugin-defined value type.
#[derive(Clone, Debug, PartialEq)]
pub struct Sequence(pub Vec<i64>);

pub struct SequenceRepr;

impl Representation for SequenceRepr {
    type Value = Sequence;

    fn compute_properties(
        &self,
        value: &Sequence,
        request: &PropertyRequest<'_>,
    ) -> Result<PropertyMap> {
        let mut props = PropertyMap::new();
        if request.wants("is_sorted") {
            let sorted = value.0.windows(2).all(|pair| pair[0] <= pair[1]);
            props.insert("is_sorted".to_string(), sorted.into());
        }
        Ok(props)
    }

    fn assert_equal(
        &self,
        left: &Sequence,
        right: &Sequence,
        tolerance: Tolerance,
    ) -> plugin_registry::Result<()> {
        compare_keyed(
            left.0.iter().enumerate().map(|(i, v)| (i, *v as f64)),
            right.0.iter().enumerate().map(|(i, v)| (i, *v as f64)),
            tolerance,
        )
    }
}

/// A model holding `Foo` with one property, `is_sorted`.
pub fn foo_model() -> Result<(TypeModel, Arc<AbstractType>)> {
    let mut model = TypeModel::new();
    let foo = model.declare(TypeDeclaration::new("Foo").property("is_sorted", [true, false]))?;
    Ok((model, foo))
}

pub fn native(name: &str, ty: &Arc<AbstractType>) -> Arc<ConcreteType> {
    Arc::new(ConcreteType::native(name, ty.clone(), SequenceRepr))
}

pub fn wrapper(name: &str, ty: &Arc<AbstractType>, provides: CapabilitySet) -> Arc<ConcreteType> {
    Arc::new(ConcreteType::wrapper(name, ty.clone(), provides, SequenceRepr))
}

pub fn signature(path: &str, input: &Arc<AbstractType>) -> Result<Arc<AbstractAlgorithm>> {
    Ok(Arc::new(
        AbstractAlgorithm::builder(path)
            .param("x", ParamType::of(input.clone()))
            .returns(ParamType::of(input.clone()))
            .build()?,
    ))
}

/// A concrete algorithm that returns its first argument unchanged.
pub fn identity_impl(
    path: &str,
    name: &str,
    concrete: &Arc<ConcreteType>,
) -> Result<Arc<ConcreteAlgorithm>> {
    let implementation: Implementation = Arc::new(
        |args: &[&dyn Any]| -> Result<Box<dyn Any + Send + Sync>> {
            let value = args
                .first()
                .copied()
                .and_then(|arg| arg.downcast_ref::<Sequence>())
                .ok_or_else(|| anyhow!("expected a Sequence"))?;
            Ok(Box::new(value.clone()))
        },
    );
    Ok(Arc::new(
        ConcreteAlgorithm::builder(path, name)
            .param("x", ConcreteParamType::Concrete(concrete.clone()))
            .returns(ConcreteParamType::Concrete(concrete.clone()))
            .build(implementation)?,
    ))
}

pub fn names(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}
