use crate::portfolio::dto::{AnalysisResponse, MacroViews, Portfolio, PortfolioSummary};

pub const INITIAL_ANALYSIS_SYSTEM_PROMPT: &str = r#"You are an experienced investment committee member at a sophisticated hedge fund. Your role is to evaluate investment decisions with rigor and skepticism.

For the INITIAL analysis, provide a comprehensive overview that includes:

1. INSIGHTS: How well does this portfolio align with the stated macro views? What are the key strengths and strategic positioning?

2. CONTRADICTIONS: What contradictions exist between the macro views and portfolio positioning? What potential misalignments should be addressed?

3. RECOMMENDATIONS: What specific actions would you recommend to optimize the portfolio given the macro environment?

4. RISK ASSESSMENT: What are the key risks given the macro environment described? Include both portfolio-specific and macro risks.

5. FOLLOW-UP QUESTIONS: What critical questions would you ask to deepen the investment thesis and identify potential blind spots?

Format your response with clear section headers using **bold** text. Be direct, analytical, and provide actionable insights. Focus on the big picture alignment between macro views and portfolio positioning."#;

pub const FOLLOW_UP_SYSTEM_PROMPT: &str = r#"You are an experienced investment committee member having a conversation with an investor.
For follow-up questions, respond conversationally and naturally. Don't repeat the structured format. Instead:
- Answer the specific question asked
- Provide actionable insights
- Ask clarifying questions if needed
- Reference the portfolio context when relevant
- Be conversational but professional
Keep your response focused and direct. Don't regurgitate the initial analysis structure."#;

pub const QUESTION_GENERATION_SYSTEM_PROMPT: &str = "You are an investment committee member. Generate 3-5 follow-up questions based on the portfolio analysis and macro views. Questions should be specific, actionable, and help deepen the investment thesis.";

pub fn build_initial_analysis_prompt(
    portfolio: &Portfolio,
    summary: &PortfolioSummary,
    macro_views: &MacroViews,
) -> String {
    let allocation_lines = summary
        .allocation_by_kind
        .iter()
        .map(|(kind, amount)| {
            let percent = summary
                .allocation_by_kind_percent
                .get(kind)
                .copied()
                .unwrap_or(0.0);
            format!("- {}: ${:.2} ({:.1}%)", kind, amount, percent)
        })
        .collect::<Vec<_>>()
        .join("\n");

    let asset_lines = portfolio
        .assets
        .iter()
        .map(|asset| {
            let value = asset.current_value();
            let gain_loss = value - asset.cost_basis();
            // A zero cost basis renders as inf/NaN in the output text.
            let gain_loss_percent = gain_loss / asset.cost_basis() * 100.0;
            format!(
                "- {} ({}): {} shares @ ${:.2} = ${:.2} ({}{:.2}, {:.1}%)",
                asset.ticker,
                asset.name,
                asset.quantity,
                asset.purchase_price,
                value,
                if gain_loss >= 0.0 { "+" } else { "" },
                gain_loss,
                gain_loss_percent
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Please analyze this investment portfolio in the context of the stated macro views:

PORTFOLIO SUMMARY:
- Total Value: ${:.2}
- Total Cost: ${:.2}
- Total Gain/Loss: ${:.2} ({:.2}%)

ASSET ALLOCATION:
{}

ASSETS:
{}

MACRO VIEWS:
- Economic Growth: {}
- Interest Rates: {}
- Government Policy: {}
- Geopolitics: {}
- Industry/Sector Views: {}

Please provide a comprehensive analysis following the structured format requested."#,
        summary.total_value,
        summary.total_cost,
        summary.total_gain_loss,
        summary.total_gain_loss_percent,
        allocation_lines,
        asset_lines,
        macro_views.economic_growth,
        macro_views.interest_rates,
        macro_views.government_policy,
        macro_views.geopolitics,
        macro_views.industry_specific
    )
}

pub fn build_follow_up_prompt(
    summary: &PortfolioSummary,
    macro_views: &MacroViews,
    question: &str,
) -> String {
    let allocation = summary
        .allocation_by_kind_percent
        .iter()
        .map(|(kind, percent)| format!("{}: {:.1}%", kind, percent))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Based on this portfolio and macro context, please answer this specific question: "{}"

PORTFOLIO CONTEXT:
- Total Value: ${:.2}
- Asset Allocation: {}

MACRO CONTEXT:
- Economic Growth: {}
- Interest Rates: {}
- Government Policy: {}
- Geopolitics: {}

Please provide a conversational, direct answer to the question while referencing the portfolio and macro context when relevant."#,
        question,
        summary.total_value,
        allocation,
        macro_views.economic_growth,
        macro_views.interest_rates,
        macro_views.government_policy,
        macro_views.geopolitics
    )
}

pub fn build_question_generation_prompt(
    portfolio: &Portfolio,
    summary: &PortfolioSummary,
    macro_views: &MacroViews,
    previous_analysis: &AnalysisResponse,
) -> String {
    format!(
        r#"Based on this portfolio analysis and macro views, generate follow-up questions:

PORTFOLIO: {} assets, total value ${:.2}
MACRO VIEWS: {}
PREVIOUS ANALYSIS: {}

Generate 3-5 specific follow-up questions."#,
        portfolio.assets.len(),
        summary.total_value,
        macro_views.non_empty().join("; "),
        previous_analysis.insights.join("; ")
    )
}
