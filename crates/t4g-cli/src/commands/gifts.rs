use t4g_api_models::{Gift, GiftDraft, ResourceId};
use t4g_gateway::{ResourceView, placeholder_gifts};

use crate::cli::OutputFormat;
use crate::client::{AppContext, CliResult, expect_success};
use crate::commands::settle_view;
use crate::output::{render_delete, render_gift, render_gifts};

pub(crate) async fn handle_list(
    ctx: &AppContext,
    placeholder: bool,
    format: OutputFormat,
) -> CliResult<()> {
    let mut view: ResourceView<Vec<Gift>> = ResourceView::new("gifts");
    view.begin();
    view.apply(
        ctx.mediator.list_gifts().await,
        placeholder.then(placeholder_gifts),
    );
    let gifts = settle_view(view)?;
    render_gifts(&gifts, format)
}

pub(crate) async fn handle_create(
    ctx: &AppContext,
    draft: GiftDraft,
    format: OutputFormat,
) -> CliResult<()> {
    let gift = expect_success(ctx.mediator.create_gift(&draft).await, "create gift")?;
    render_gift(&gift, format)
}

pub(crate) async fn handle_update(
    ctx: &AppContext,
    id: &ResourceId,
    draft: GiftDraft,
    format: OutputFormat,
) -> CliResult<()> {
    let gift = expect_success(ctx.mediator.update_gift(id, &draft).await, "update gift")?;
    render_gift(&gift, format)
}

pub(crate) async fn handle_delete(
    ctx: &AppContext,
    id: &ResourceId,
    format: OutputFormat,
) -> CliResult<()> {
    let ack = expect_success(ctx.mediator.delete_gift(id).await, "delete gift")?;
    render_delete(&format!("gift {id}"), ack, format)
}
