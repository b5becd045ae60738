use evfilter::common::XYWHRectangle;
use evfilter::config::QuadTreeConfig;
use evfilter::errors::{ErrorKind, EvFilterError, EvFilterResult};
use evfilter::filter::{EventEvaluator, FilterConstant, FilterHandle, FilterHandleSet, FilterOperator};
use evfilter::index::{AdvancedIndexLookupable, FilterIndexFactory, FilterIndexRegistry, Lookupable};
use evfilter_spatial::SpatialModule;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Runs `test` between `before` and `after`. `after` runs whether the test
/// fails or not; any failure panics with the step that failed.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> EvFilterResult<()>,
    B: Fn() -> EvFilterResult<TestContext>,
    A: Fn(TestContext) -> EvFilterResult<()>,
{
    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let result = catch_unwind(AssertUnwindSafe(|| test(ctx.clone())));
    let after_result = after(ctx);

    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => panic!("Test failed: {:?}", e),
        Err(panic_err) => std::panic::resume_unwind(panic_err),
    }
    if let Err(e) = after_result {
        panic!("After run failed: {:?}", e);
    }
}

#[derive(Clone)]
pub struct TestContext {
    registry: FilterIndexRegistry,
    region: QuadTreeConfig,
}

impl TestContext {
    pub fn new(registry: FilterIndexRegistry, region: QuadTreeConfig) -> Self {
        Self { registry, region }
    }

    pub fn registry(&self) -> FilterIndexRegistry {
        self.registry.clone()
    }

    pub fn region(&self) -> &QuadTreeConfig {
        &self.region
    }

    /// Lookupable reading the `px`, `py`, `pw` and `ph` event properties,
    /// indexed over the context's region.
    pub fn position_lookupable(&self) -> Lookupable {
        AdvancedIndexLookupable::properties("px", "py", "pw", "ph", self.region.clone()).into()
    }
}

pub fn create_test_context() -> EvFilterResult<TestContext> {
    let region = QuadTreeConfig::new(0.0, 0.0, 100.0, 100.0);
    region.validate()?;
    Ok(TestContext::new(FilterIndexRegistry::new(FilterIndexFactory::new()), region))
}

pub fn create_spatial_test_context() -> EvFilterResult<TestContext> {
    create_spatial_test_context_with(QuadTreeConfig::new(0.0, 0.0, 100.0, 100.0))
}

pub fn create_spatial_test_context_with(region: QuadTreeConfig) -> EvFilterResult<TestContext> {
    region.validate()?;
    let mut factory = FilterIndexFactory::new();
    factory.load_module(&SpatialModule)?;
    Ok(TestContext::new(FilterIndexRegistry::new(factory), region))
}

pub fn cleanup(ctx: TestContext) -> EvFilterResult<()> {
    log::debug!("Test finished with {} live filter indexes", ctx.registry().index_count());
    Ok(())
}

/// Registers a statement filter the way a filter service does: under the
/// index write lock, taken through the registry, either joins the evaluator
/// already stored under the constant or stores a new one.
pub fn register_filter(
    ctx: &TestContext,
    operator: FilterOperator,
    lookupable: &Lookupable,
    constant: &FilterConstant,
    handle: FilterHandle,
) -> EvFilterResult<()> {
    ctx.registry().write_index(operator, lookupable, |index| {
        match index.get(constant)? {
            Some(evaluator) => {
                handle_set(&evaluator)?.add(handle);
            }
            None => {
                let handles = FilterHandleSet::new();
                handles.add(handle);
                index.put(constant, EventEvaluator::new(handles))?;
            }
        }
        Ok(())
    })
}

/// Reverses [`register_filter`]; drops the constant once no handle uses it
/// and the index once no constant remains.
pub fn unregister_filter(
    ctx: &TestContext,
    operator: FilterOperator,
    lookupable: &Lookupable,
    constant: &FilterConstant,
    handle: &FilterHandle,
) -> EvFilterResult<()> {
    let registry = ctx.registry();
    let emptied = registry.write_existing_index(operator, lookupable, |index| {
        if let Some(evaluator) = index.get(constant)? {
            let handles = handle_set(&evaluator)?;
            handles.remove(handle);
            if handles.is_empty() {
                index.remove(constant)?;
            }
        }
        Ok(index.is_empty())
    })?;
    if emptied == Some(true) {
        registry.release(operator, lookupable);
    }
    Ok(())
}

fn handle_set(evaluator: &EventEvaluator) -> EvFilterResult<&FilterHandleSet> {
    evaluator
        .downcast_ref::<FilterHandleSet>()
        .ok_or_else(|| EvFilterError::new("Evaluator is not a handle set", ErrorKind::InternalError))
}

pub fn rect(x: f64, y: f64, w: f64, h: f64) -> FilterConstant {
    XYWHRectangle::new(x, y, w, h).into()
}
