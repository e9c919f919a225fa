use anyhow::Result;

use ember::prelude::*;

mod framework;

use framework::{make_context, make_node, single_rtv, Call, Context, MaskOverrideListener};

fn make_pass(ctx: &Context, definition: &PassDef) -> Result<WarmUpPass> {
    WarmUpPass::new(definition, ctx.camera.clone(), &ctx.node, &single_rtv("rt0"))
}

fn collects(calls: &[Call]) -> usize {
    calls.iter().filter(|call| matches!(call, Call::Collect { .. })).count()
}

fn triggers(calls: &[Call]) -> usize {
    calls.iter().filter(|call| **call == Call::Trigger).count()
}

fn collect(camera: &str, visibility_mask: u32, first_rq: u8, last_rq: u8) -> Call {
    Call::Collect {
        camera: camera.to_owned(),
        visibility_mask,
        first_rq,
        last_rq,
    }
}

#[test]
pub fn execute_with_shadow_node() -> Result<()> {
    let ctx = make_context();
    ctx.record_listener_calls();
    ctx.workspace.borrow_mut().add_shadow_node("sun", true);

    let definition = PassBuilder::warm_up()
        .identifier(7)
        .visibility_mask(0xf0)?
        .render_queues(10, 50)?
        .shadow_node("sun")?
        .mode(WarmUpMode::COLLECT_AND_TRIGGER)?
        .build();
    let mut pass = make_pass(&ctx, &definition)?;
    assert!(!pass.shadow_node_created());
    assert_eq!(pass.state(), PassState::Armed);
    assert!(ctx.take_calls().is_empty());

    pass.execute(None)?;
    let sun = Some(String::from("sun"));
    assert_eq!(
        ctx.take_calls(),
        [
            Call::EarlyPreExecute(7),
            Call::SetShadowNode(sun.clone()),
            Call::PreExecute(7),
            Call::NotifyViewport(String::from("main"), 0xf0),
            Call::ShadowUpdate {
                shadow_node: String::from("sun"),
                camera: String::from("main"),
                lod_camera: None,
            },
            Call::SetShadowNode(None),
            Call::SetShadowNode(sun),
            Call::NotifyViewport(String::from("main"), 0xf0),
            Call::AfterShadowMaps,
            Call::ResourceTransitions(1),
            Call::SetRenderPassDesc(1),
            Call::CamerasInProgress(String::from("main")),
            Call::ForwardPlus(true),
            Call::CurrentPass(Some(7)),
            Call::DelayedActions,
            collect("main", 0xf0, 10, 50),
            Call::Trigger,
            Call::CurrentPass(None),
            Call::PosExecute(7),
        ]
    );

    // The shadow update clobbered the masks, they were restored afterwards.
    let viewport = ctx.viewport();
    assert_eq!(viewport.visibility_mask(), 0xf0);
    assert_eq!(viewport.light_visibility_mask(), 0xffff_ffff);
    assert_eq!(pass.state(), PassState::Idle);
    Ok(())
}

#[test]
pub fn execute_without_shadow_node() -> Result<()> {
    let ctx = make_context();
    let definition = PassBuilder::warm_up().identifier(1).forward_plus(false)?.build();
    let mut pass = make_pass(&ctx, &definition)?;
    assert!(pass.shadow_node().is_none());

    pass.execute(None)?;
    assert_eq!(
        ctx.take_calls(),
        [
            Call::SetShadowNode(None),
            Call::ResourceTransitions(1),
            Call::SetRenderPassDesc(1),
            Call::CamerasInProgress(String::from("main")),
            Call::ForwardPlus(false),
            Call::CurrentPass(Some(1)),
            Call::DelayedActions,
            collect("main", 0xffff_ffff, 0, 255),
            Call::Trigger,
            Call::CurrentPass(None),
        ]
    );
    Ok(())
}

#[test]
pub fn empty_attachments_are_not_bound() -> Result<()> {
    let ctx = make_context();
    let mut rtv = single_rtv("rt0");
    rtv.colour_attachments.push(RenderTargetViewEntry::new(""));
    rtv.colour_attachments[0] = RenderTargetViewEntry::new("rt0").resolve("");
    let mut pass = WarmUpPass::new(&PassBuilder::warm_up().build(), ctx.camera.clone(), &ctx.node, &rtv)?;

    pass.execute(None)?;
    assert!(ctx.take_calls().contains(&Call::SetRenderPassDesc(1)));
    Ok(())
}

#[test]
pub fn mode_selects_phases() -> Result<()> {
    let ctx = make_context();
    for (mode, expected_collects, expected_triggers) in [
        (WarmUpMode::COLLECT, 1, 0),
        (WarmUpMode::TRIGGER, 0, 1),
        (WarmUpMode::COLLECT_AND_TRIGGER, 1, 1),
        (WarmUpMode::empty(), 0, 0),
    ] {
        let definition = PassBuilder::warm_up().mode(mode)?.build();
        let mut pass = make_pass(&ctx, &definition)?;
        pass.execute(None)?;
        let calls = ctx.take_calls();
        assert_eq!(collects(&calls), expected_collects, "{mode:?}");
        assert_eq!(triggers(&calls), expected_triggers, "{mode:?}");
        // Collect always comes first.
        if expected_collects + expected_triggers == 2 {
            let collect_at = calls.iter().position(|call| matches!(call, Call::Collect { .. }));
            let trigger_at = calls.iter().position(|call| *call == Call::Trigger);
            assert!(collect_at < trigger_at);
        }
    }
    Ok(())
}

#[test]
pub fn zero_budget_has_no_side_effects() -> Result<()> {
    let ctx = make_context();
    ctx.record_listener_calls();
    ctx.workspace.borrow_mut().add_shadow_node("sun", true);
    let definition = PassBuilder::warm_up()
        .num_initial(0)
        .visibility_mask(0xf0)?
        .shadow_node("sun")?
        .build();
    let mut pass = make_pass(&ctx, &definition)?;
    assert_eq!(pass.state(), PassState::Exhausted);

    pass.execute(None)?;
    assert!(ctx.take_calls().is_empty());
    assert_eq!(ctx.viewport().visibility_mask(), 0xffff_ffff);
    assert_eq!(pass.num_passes_left(), Some(0));
    assert_eq!(pass.state(), PassState::Exhausted);
    Ok(())
}

#[test]
pub fn budget_is_spent() -> Result<()> {
    let ctx = make_context();
    let definition = PassBuilder::warm_up().num_initial(2).build();
    let mut pass = make_pass(&ctx, &definition)?;
    assert_eq!(pass.num_passes_left(), Some(2));

    pass.execute(None)?;
    assert_eq!(pass.num_passes_left(), Some(1));
    assert_eq!(pass.state(), PassState::Idle);
    assert_eq!(collects(&ctx.take_calls()), 1);

    pass.execute(None)?;
    assert_eq!(pass.num_passes_left(), Some(0));
    assert_eq!(pass.state(), PassState::Exhausted);
    assert_eq!(collects(&ctx.take_calls()), 1);

    pass.execute(None)?;
    assert!(ctx.take_calls().is_empty());
    Ok(())
}

#[test]
pub fn unlimited_budget() -> Result<()> {
    let ctx = make_context();
    let mut pass = make_pass(&ctx, &PassBuilder::warm_up().build())?;
    for _ in 0..3 {
        pass.execute(None)?;
    }
    assert_eq!(pass.num_passes_left(), None);
    assert_eq!(pass.state(), PassState::Idle);
    assert_eq!(triggers(&ctx.take_calls()), 3);
    Ok(())
}

#[test]
pub fn skip_load_store_with_shadow_node_fails() -> Result<()> {
    let ctx = make_context();
    ctx.workspace.borrow_mut().add_shadow_node("sun", true);
    let definition = PassBuilder::warm_up()
        .identifier(3)
        .skip_load_store_semantics(true)
        .shadow_node("sun")?
        .build();
    let mut pass = make_pass(&ctx, &definition)?;

    let err = pass.execute(None).unwrap_err();
    let err = err.downcast_ref::<Error>().unwrap();
    assert_eq!(*err, Error::SkipLoadStoreWithShadowNode(String::from("warm_up:3")));
    assert!(err.is_configuration_error());

    let calls = ctx.take_calls();
    assert_eq!(collects(&calls), 0);
    assert_eq!(triggers(&calls), 0);
    assert!(!calls.iter().any(|call| matches!(call, Call::ShadowUpdate { .. })));
    assert!(!calls.iter().any(|call| matches!(call, Call::ResourceTransitions(_))));
    assert_ne!(pass.state(), PassState::Executing);
    Ok(())
}

#[test]
pub fn disabled_shadow_node_is_ignored() -> Result<()> {
    let ctx = make_context();
    ctx.workspace.borrow_mut().add_shadow_node("sun", false);
    // Nothing to update, so skipping load/store semantics is fine.
    let definition = PassBuilder::warm_up()
        .skip_load_store_semantics(true)
        .shadow_node("sun")?
        .build();
    let mut pass = make_pass(&ctx, &definition)?;
    assert!(pass.shadow_node().is_some());

    pass.execute(None)?;
    let calls = ctx.take_calls();
    assert_eq!(calls[0], Call::SetShadowNode(None));
    assert!(!calls.iter().any(|call| matches!(call, Call::ShadowUpdate { .. })));
    assert_eq!(collects(&calls), 1);
    Ok(())
}

#[test]
pub fn lod_camera_reaches_shadow_node() -> Result<()> {
    let ctx = make_context();
    ctx.workspace.borrow_mut().add_shadow_node("sun", true);
    let lod = ctx.workspace.borrow_mut().add_camera("lod");
    let definition = PassBuilder::warm_up().shadow_node("sun")?.build();
    let mut pass = make_pass(&ctx, &definition)?;

    pass.execute(Some(&lod))?;
    assert!(ctx.take_calls().contains(&Call::ShadowUpdate {
        shadow_node: String::from("sun"),
        camera: String::from("main"),
        lod_camera: Some(String::from("lod")),
    }));
    Ok(())
}

#[test]
pub fn listener_can_change_viewport() -> Result<()> {
    let ctx = make_context();
    let listener: ListenerHandle = shared(MaskOverrideListener {
        mask: 0x0f,
    });
    ctx.workspace.borrow_mut().add_listener(listener);
    ctx.workspace.borrow_mut().add_shadow_node("sun", true);
    let definition = PassBuilder::warm_up().visibility_mask(0xf0)?.shadow_node("sun")?.build();
    let mut pass = make_pass(&ctx, &definition)?;

    pass.execute(None)?;
    let calls = ctx.take_calls();
    let notified: Vec<u32> = calls
        .iter()
        .filter_map(|call| match call {
            Call::NotifyViewport(_, mask) => Some(*mask),
            _ => None,
        })
        .collect();
    // Masks saved before the shadow update are the ones the listener left behind.
    assert_eq!(notified, [0x0f, 0x0f]);
    assert_eq!(ctx.viewport().visibility_mask(), 0x0f);
    // Collection still looks at the configured scope.
    assert!(calls.contains(&collect("main", 0xf0, 0, 255)));
    Ok(())
}

#[test]
pub fn shadow_node_is_created_on_demand() -> Result<()> {
    let ctx = make_context();
    ctx.workspace.borrow_mut().add_shadow_node_def("sun");
    let definition = PassBuilder::warm_up().shadow_node("sun")?.build();

    let first = make_pass(&ctx, &definition)?;
    assert!(first.shadow_node_created());
    let second = make_pass(&ctx, &definition)?;
    assert!(!second.shadow_node_created());
    assert_eq!(second.shadow_node().unwrap().borrow().name(), "sun");
    Ok(())
}

#[test]
pub fn unknown_shadow_node_fails() -> Result<()> {
    let ctx = make_context();
    let definition = PassBuilder::warm_up().shadow_node("moon")?.build();
    let err = make_pass(&ctx, &definition).unwrap_err();
    assert_eq!(
        err.downcast_ref::<Error>(),
        Some(&Error::ShadowNodeNotFound(String::from("moon")))
    );
    Ok(())
}

#[test]
pub fn named_camera() -> Result<()> {
    let ctx = make_context();
    ctx.workspace.borrow_mut().add_camera("probe");
    let definition = PassBuilder::warm_up().camera("probe")?.build();
    let mut pass = make_pass(&ctx, &definition)?;
    assert_eq!(pass.camera().borrow().name(), "probe");

    pass.execute(None)?;
    let calls = ctx.take_calls();
    assert!(calls.contains(&Call::CamerasInProgress(String::from("probe"))));
    assert!(calls.contains(&collect("probe", 0xffff_ffff, 0, 255)));
    Ok(())
}

#[test]
pub fn unknown_camera_fails() -> Result<()> {
    let ctx = make_context();
    let definition = PassBuilder::warm_up().camera("probe")?.build();
    let err = make_pass(&ctx, &definition).unwrap_err();
    assert_eq!(err.downcast_ref::<Error>(), Some(&Error::CameraNotFound(String::from("probe"))));
    Ok(())
}

#[test]
pub fn requires_warm_up_definition() -> Result<()> {
    let ctx = make_context();
    let err = make_pass(&ctx, &PassBuilder::scene().build()).unwrap_err();
    assert_eq!(
        err.downcast_ref::<Error>(),
        Some(&Error::PassTypeMismatch {
            expected: PassType::WarmUp,
            found: PassType::Scene,
        })
    );
    Ok(())
}

#[test]
pub fn pass_info() -> Result<()> {
    let ctx = make_context();
    let definition = PassBuilder::warm_up().identifier(11).profiling_id("opaque").build();
    let pass = make_pass(&ctx, &definition)?;
    assert_eq!(
        *pass.info(),
        PassInfo {
            node: String::from("warm_up"),
            identifier: 11,
            pass_type: PassType::WarmUp,
            profiling_id: String::from("opaque"),
        }
    );
    Ok(())
}

#[test]
pub fn warm_up_node_triggers_once() -> Result<()> {
    let ctx = make_context();
    let reference = make_node(
        "main",
        &[&[PassType::Scene, PassType::Scene], &[PassType::Quad], &[PassType::Scene]],
    );
    let warm_up = WarmUpGraphBuilder::new().build(&reference, "main/warm_up")?;

    let mut passes = vec![];
    for target in warm_up.target_passes() {
        let rtv = warm_up.render_target_view(target.render_target_name())?;
        for definition in target.passes() {
            passes.push(WarmUpPass::new(definition, ctx.camera.clone(), &ctx.node, rtv)?);
        }
    }
    for pass in passes.iter_mut() {
        pass.execute(None)?;
    }

    let calls = ctx.take_calls();
    assert_eq!(collects(&calls), 3);
    assert_eq!(triggers(&calls), 1);
    let last_collect = calls.iter().rposition(|call| matches!(call, Call::Collect { .. }));
    let trigger = calls.iter().position(|call| *call == Call::Trigger);
    assert!(last_collect < trigger);
    Ok(())
}
