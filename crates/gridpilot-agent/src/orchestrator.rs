//! The orchestrator — one query in, sequential stage calls, one answer out.

use gridpilot_core::{Error, GridPilotConfig, GuardrailMode, PlantMeta, Result};
use gridpilot_dispatch::{solve, DispatchProblem};
use gridpilot_forecast::{Forecast, Forecaster};
use gridpilot_llm::{classify_relevance, heuristic_relevance, providers, ChatMessage, LlmConfig, RelevanceVerdict};
use gridpilot_retrieve::{KnowledgeBase, RetrievalHit};
use tracing::{info, warn};

use crate::report;
use crate::types::DispatchAnswer;

/// Snippets retrieved per query.
const RETRIEVAL_TOP_K: usize = 3;

const REJECTION_MESSAGE: &str = "This assistant answers questions about solar \
generation forecasts, curtailment, and battery dispatch. Your query looks \
unrelated to plant operations, so the dispatch pipeline was not run.";

const RECOMMENDER_PROMPT: &str = "You are an agentic dispatch assistant \
specializing in curtailment management and BESS dispatch. You are given a \
solar forecast, retrieved engineering insights, and a dispatch plan. Write a \
concise recommendation for the operator that explicitly references all three.";

/// Chains guardrail, forecast, retrieval, and dispatch for one query.
pub struct DispatchAgent {
    forecaster: Forecaster,
    knowledge: KnowledgeBase,
    llm: LlmConfig,
    guardrail: GuardrailMode,
    client: reqwest::Client,
}

impl DispatchAgent {
    pub fn new(config: &GridPilotConfig, knowledge: KnowledgeBase, llm: LlmConfig) -> Self {
        Self {
            forecaster: Forecaster::new(&config.forecast),
            knowledge,
            llm,
            guardrail: config.guardrail,
            client: reqwest::Client::new(),
        }
    }

    pub fn llm(&self) -> &LlmConfig {
        &self.llm
    }

    pub fn guardrail(&self) -> GuardrailMode {
        self.guardrail
    }

    pub fn knowledge_snippets(&self) -> usize {
        self.knowledge.len()
    }

    /// Run the full pipeline for one operator query.
    pub async fn run(&self, query: &str, plant: Option<PlantMeta>) -> Result<DispatchAnswer> {
        if self.check_relevance(query).await? == RelevanceVerdict::OffTopic {
            info!("Guardrail rejected query");
            return Ok(DispatchAnswer::Rejected {
                message: REJECTION_MESSAGE.to_string(),
            });
        }

        // The three stages, in fixed order.
        let forecast = self.forecaster.forecast().await;
        let hits = self.knowledge.search(query, RETRIEVAL_TOP_K);
        let plan = solve(&DispatchProblem::new(
            forecast.mw,
            plant.unwrap_or_default(),
        ));

        info!(
            forecast_mw = forecast.mw,
            hits = hits.len(),
            charge_mw = plan.charge_mw,
            curtailment_mw = plan.curtailment_mw,
            "Pipeline complete"
        );

        let recommendation = self
            .final_recommendation(query, &forecast, &hits, &plan)
            .await;
        let report = report::compose(query, &forecast, &hits, &plan, &recommendation);

        Ok(DispatchAnswer::Answered {
            report,
            forecast,
            hits,
            plan,
        })
    }

    /// Apply the guardrail according to its mode.
    async fn check_relevance(&self, query: &str) -> Result<RelevanceVerdict> {
        match self.guardrail {
            GuardrailMode::Off => Ok(RelevanceVerdict::Relevant),
            GuardrailMode::Strict => classify_relevance(&self.client, &self.llm, query).await,
            GuardrailMode::Auto => {
                if self.llm.is_configured() {
                    match classify_relevance(&self.client, &self.llm, query).await {
                        Ok(verdict) => Ok(verdict),
                        Err(e) => {
                            warn!("Guardrail classification failed, using heuristic: {}", e);
                            Ok(heuristic_relevance(query))
                        }
                    }
                } else {
                    Ok(heuristic_relevance(query))
                }
            }
        }
    }

    /// One synthesis completion over the stage outputs, or the canned line
    /// when offline or on API failure.
    async fn final_recommendation(
        &self,
        query: &str,
        forecast: &Forecast,
        hits: &[RetrievalHit],
        plan: &gridpilot_dispatch::DispatchPlan,
    ) -> String {
        let Some((provider, model, api_key)) = self.llm.resolve_provider() else {
            return report::offline_recommendation();
        };

        let context = serde_json::json!({
            "query": query,
            "forecast": forecast,
            "insights": hits,
            "dispatch_plan": plan,
        });
        let messages = [
            ChatMessage::system(RECOMMENDER_PROMPT),
            ChatMessage::user(format!(
                "Operator query and pipeline outputs:\n{}",
                serde_json::to_string_pretty(&context).unwrap_or_else(|_| context.to_string())
            )),
        ];

        match providers::complete(&self.client, provider, &messages, &model, &api_key, 0.3, 512)
            .await
        {
            Ok(completion) => completion.text,
            Err(e) => {
                warn!("Recommendation completion failed, using canned text: {}", e);
                report::offline_recommendation()
            }
        }
    }
}

/// Validate cross-cutting configuration the individual crates cannot see.
///
/// `strict` guardrail needs an LLM provider; failing at startup beats
/// failing on the first request.
pub fn validate_startup(config: &GridPilotConfig, llm: &LlmConfig) -> Result<()> {
    if config.guardrail == GuardrailMode::Strict && !llm.is_configured() {
        return Err(Error::Config(
            "GRIDPILOT_GUARDRAIL=strict requires an LLM API key \
             (OPENAI_API_KEY, ANTHROPIC_API_KEY, or GROQ_API_KEY)"
                .into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridpilot_core::config::{ForecastConfig, ForecastProviderKind};

    fn offline_agent(guardrail: GuardrailMode) -> DispatchAgent {
        let config = GridPilotConfig {
            guardrail,
            forecast: ForecastConfig {
                provider: ForecastProviderKind::Stub,
                endpoint_url: None,
                api_key: None,
                location: None,
                history_file: None,
            },
            ..GridPilotConfig::default()
        };
        DispatchAgent::new(&config, KnowledgeBase::with_defaults(), LlmConfig::default())
    }

    #[tokio::test]
    async fn test_off_topic_query_is_rejected_without_running_stages() {
        let agent = offline_agent(GuardrailMode::Auto);
        let answer = agent
            .run("What is the best pizza topping?", None)
            .await
            .unwrap();

        assert!(answer.is_rejected());
        // The rejection is explanatory and carries no stage output.
        assert!(answer.text().contains("unrelated"));
        assert!(!answer.text().contains("Solar Forecast"));
    }

    #[tokio::test]
    async fn test_guardrail_off_answers_anything() {
        let agent = offline_agent(GuardrailMode::Off);
        let answer = agent.run("What is the best pizza topping?", None).await.unwrap();
        assert!(!answer.is_rejected());
    }

    #[tokio::test]
    async fn test_strict_guardrail_without_provider_fails() {
        let agent = offline_agent(GuardrailMode::Strict);
        assert!(agent.run("Should we curtail?", None).await.is_err());
    }

    #[tokio::test]
    async fn test_relevant_query_reports_all_three_stages_in_order() {
        let agent = offline_agent(GuardrailMode::Auto);
        let answer = agent
            .run("Should we curtail solar output this afternoon?", None)
            .await
            .unwrap();

        let DispatchAnswer::Answered { report, forecast, hits, plan } = &answer else {
            panic!("expected an answered pipeline, got {:?}", answer);
        };

        assert_eq!(forecast.mw, 42.5);
        assert!(!hits.is_empty());
        assert_eq!(plan.charge_mw, 4.25);

        let forecast_at = report.find("Solar Forecast:").unwrap();
        let insights_at = report.find("Grounded Insights:").unwrap();
        let dispatch_at = report.find("Optimized Dispatch:").unwrap();
        assert!(forecast_at < insights_at && insights_at < dispatch_at);
        assert!(report.contains("42.50"));
        // Offline mode says so instead of failing.
        assert!(report.contains("No LLM provider configured"));
    }

    #[tokio::test]
    async fn test_plant_meta_flows_into_the_plan() {
        let agent = offline_agent(GuardrailMode::Off);
        let plant = PlantMeta {
            soc: 1.0,
            capacity_mwh: 10.0,
            max_charge_mw: 5.0,
            max_discharge_mw: 5.0,
        };
        let answer = agent.run("battery dispatch?", Some(plant)).await.unwrap();

        let DispatchAnswer::Answered { plan, .. } = answer else {
            panic!("expected an answer");
        };
        // Full battery: the clipped surplus curtails instead of charging.
        assert_eq!(plan.charge_mw, 0.0);
        assert!(plan.curtailment_mw > 0.0);
    }

    #[test]
    fn test_validate_startup_strict_requires_llm() {
        let config = GridPilotConfig {
            guardrail: GuardrailMode::Strict,
            ..GridPilotConfig::default()
        };
        assert!(validate_startup(&config, &LlmConfig::default()).is_err());

        let llm = LlmConfig {
            groq_api_key: Some("gq-1".into()),
            ..LlmConfig::default()
        };
        assert!(validate_startup(&config, &llm).is_ok());
    }
}
