use evfilter::common::Value;
use evfilter::errors::ErrorKind;
use evfilter::event::EventBean;
use evfilter::filter::{FilterConstant, FilterHandle, FilterOperator};
use evfilter::index::{FilterSpecLookupable, Lookupable};
use evfilter_int_test::test_util::{
    cleanup, create_spatial_test_context, create_test_context, rect, register_filter, run_test, unregister_filter,
};

#[ctor::ctor]
fn init() {
    colog::init();
}

fn symbol() -> Lookupable {
    FilterSpecLookupable::property("symbol").into()
}

#[test]
fn test_advanced_index_requires_module() {
    run_test(
        create_test_context,
        |ctx| {
            let err = register_filter(
                &ctx,
                FilterOperator::AdvancedIndex,
                &ctx.position_lookupable(),
                &rect(1.0, 1.0, 1.0, 1.0),
                FilterHandle::new(1, 0),
            )
            .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::IndexingError);
            assert_eq!(ctx.registry().index_count(), 0);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_equality_and_spatial_side_by_side() {
    run_test(
        create_spatial_test_context,
        |ctx| {
            let acme = FilterConstant::Value(Value::from("ACME"));
            register_filter(&ctx, FilterOperator::Equal, &symbol(), &acme, FilterHandle::new(1, 0))?;
            register_filter(
                &ctx,
                FilterOperator::AdvancedIndex,
                &ctx.position_lookupable(),
                &rect(10.0, 10.0, 10.0, 10.0),
                FilterHandle::new(2, 0),
            )?;
            assert_eq!(ctx.registry().index_count(), 2);

            let event = EventBean::new("Tick")
                .with("symbol", "ACME")
                .with("px", 15.0)
                .with("py", 15.0)
                .with("pw", 1.0)
                .with("ph", 1.0);
            let mut matches = Vec::new();
            ctx.registry().match_event(&event, &mut matches)?;
            matches.sort();
            assert_eq!(matches, vec![FilterHandle::new(1, 0), FilterHandle::new(2, 0)]);

            unregister_filter(&ctx, FilterOperator::Equal, &symbol(), &acme, &FilterHandle::new(1, 0))?;
            assert_eq!(ctx.registry().index_count(), 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_mismatched_constant_kinds() {
    run_test(
        create_spatial_test_context,
        |ctx| {
            let err = register_filter(
                &ctx,
                FilterOperator::Equal,
                &symbol(),
                &rect(1.0, 1.0, 1.0, 1.0),
                FilterHandle::new(1, 0),
            )
            .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidDataType);

            let err = register_filter(
                &ctx,
                FilterOperator::AdvancedIndex,
                &ctx.position_lookupable(),
                &FilterConstant::Value(Value::from(1i32)),
                FilterHandle::new(1, 0),
            )
            .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidDataType);

            // indexes are created before the constant is checked, and stay empty
            assert_eq!(ctx.registry().index_count(), 2);
            assert!(ctx.registry().release(FilterOperator::Equal, &symbol()));
            assert!(ctx.registry().release(FilterOperator::AdvancedIndex, &ctx.position_lookupable()));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_operator_lookupable_mismatch() {
    run_test(
        create_spatial_test_context,
        |ctx| {
            let err = ctx
                .registry()
                .get_or_create(FilterOperator::AdvancedIndex, &symbol())
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidOperation);

            let err = ctx
                .registry()
                .get_or_create(FilterOperator::Equal, &ctx.position_lookupable())
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
            Ok(())
        },
        cleanup,
    )
}
